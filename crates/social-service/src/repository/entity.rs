//! 仓储抽象的实体契约
//!
//! 每个实体通过实现这里的 trait 声明自己的表结构、可用过滤器、
//! 排序方式以及写入能力。过滤器和排序都是封闭枚举：
//! 不存在的字段在编译期就无法引用，SQL 片段全部来自常量字符串。

use sqlx::postgres::PgRow;
use sqlx::{Postgres, QueryBuilder};

/// 实体契约：表名、列清单与可用的查询维度
pub trait Entity: for<'r> sqlx::FromRow<'r, PgRow> + Send + Unpin {
    /// 表名
    const TABLE: &'static str;
    /// 错误信息中使用的实体种类标识
    const KIND: &'static str;
    /// SELECT / RETURNING 使用的列清单
    const COLUMNS: &'static str;

    /// 该实体支持的过滤条件
    type Filter: EntityFilter;
    /// 该实体支持的排序方式
    type Order: SortOrder;
}

/// 可插入实体：本核心允许为其创建新行
pub trait Insertable: Entity {
    type Create: InsertValues;
}

/// 可部分更新实体：本核心允许对其执行补丁更新
pub trait Updatable: Entity {
    type Patch: UpdateValues;
}

/// 过滤条件：向 WHERE 子句追加一个谓词及其绑定参数
pub trait EntityFilter: Send + Sync {
    fn apply(&self, qb: &mut QueryBuilder<'_, Postgres>);
}

/// 插入值：声明列清单并按同一顺序绑定参数
///
/// id 与时间戳由数据库生成，不在此列
pub trait InsertValues: Send + Sync {
    const COLUMNS: &'static str;

    fn push_values(&self, qb: &mut QueryBuilder<'_, Postgres>);
}

/// 补丁值：只为已设置的字段追加赋值
pub trait UpdateValues: Send + Sync {
    /// 追加 "col = $n" 赋值序列，返回是否至少设置了一个字段
    fn push_assignments(&self, qb: &mut QueryBuilder<'_, Postgres>) -> bool;
}

/// 排序方式：返回静态 ORDER BY 片段
pub trait SortOrder: Send + Sync {
    fn sql(&self) -> &'static str;
}

/// 分页请求
///
/// page 从 1 起，limit 限制在 [1, 100]，越界值收敛到边界
#[derive(Debug, Clone, Copy)]
pub struct PageRequest {
    page: u32,
    limit: u32,
}

impl PageRequest {
    pub fn new(page: u32, limit: u32) -> Self {
        Self {
            page: page.max(1),
            limit: limit.clamp(1, 100),
        }
    }

    pub fn page(&self) -> u32 {
        self.page
    }

    pub fn limit(&self) -> u32 {
        self.limit
    }

    pub fn offset(&self) -> i64 {
        (self.page as i64 - 1) * self.limit as i64
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self { page: 1, limit: 10 }
    }
}

/// 一页查询结果与满足条件的总行数
#[derive(Debug, Clone)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub total: i64,
}

impl<T> Page<T> {
    /// 空页
    pub fn empty() -> Self {
        Self {
            items: Vec::new(),
            total: 0,
        }
    }

    /// 按给定页大小计算总页数（向上取整），limit 为 0 时为 0
    pub fn total_pages(&self, limit: u32) -> i64 {
        if limit == 0 {
            0
        } else {
            (self.total + limit as i64 - 1) / limit as i64
        }
    }
}
