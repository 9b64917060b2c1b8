//! 通用仓储实现
//!
//! `Repository<'t, E>` 绑定在一条事务连接上，提供实体无关的五个基础操作。
//! SQL 由 QueryBuilder 组装：表名、列名全部来自实体契约的常量，
//! 过滤器只负责追加自己的谓词和绑定参数。

use std::marker::PhantomData;

use sqlx::{PgConnection, Postgres, QueryBuilder};
use uuid::Uuid;

use super::entity::{Entity, EntityFilter, InsertValues, Insertable, Page, PageRequest, SortOrder, Updatable, UpdateValues};
use crate::error::{Result, SocialError};

/// 按实体参数化的仓储
///
/// 生命周期 't 绑定到 UnitOfWork 持有的事务连接，
/// 保证同一工作单元内的所有操作落在同一事务中
pub struct Repository<'t, E: Entity> {
    conn: &'t mut PgConnection,
    _entity: PhantomData<E>,
}

impl<'t, E: Entity> Repository<'t, E> {
    pub(crate) fn new(conn: &'t mut PgConnection) -> Self {
        Self {
            conn,
            _entity: PhantomData,
        }
    }

    /// 供同模块的实体扩展查询直接使用事务连接
    pub(crate) fn conn(&mut self) -> &mut PgConnection {
        &mut *self.conn
    }

    /// 追加 WHERE 子句，多个过滤条件取 AND
    fn push_where(qb: &mut QueryBuilder<'_, Postgres>, filters: &[E::Filter]) {
        if filters.is_empty() {
            return;
        }
        qb.push(" WHERE ");
        for (i, filter) in filters.iter().enumerate() {
            if i > 0 {
                qb.push(" AND ");
            }
            filter.apply(qb);
        }
    }

    /// 查询单条匹配记录
    ///
    /// 未命中返回 None，不视为错误
    pub async fn get_one(&mut self, filters: &[E::Filter]) -> Result<Option<E>> {
        let mut qb = QueryBuilder::new(format!("SELECT {} FROM {}", E::COLUMNS, E::TABLE));
        Self::push_where(&mut qb, filters);
        qb.push(" LIMIT 1");

        let row = qb
            .build_query_as::<E>()
            .fetch_optional(&mut *self.conn)
            .await?;
        Ok(row)
    }

    /// 按主键查询
    pub async fn get_by_id(&mut self, id: Uuid) -> Result<Option<E>> {
        let sql = format!("SELECT {} FROM {} WHERE id = $1", E::COLUMNS, E::TABLE);
        let row = sqlx::query_as::<_, E>(&sql)
            .bind(id)
            .fetch_optional(&mut *self.conn)
            .await?;
        Ok(row)
    }

    /// 分页查询匹配记录及总数
    ///
    /// 返回的 items 数量不超过 page.limit()
    pub async fn get_many(
        &mut self,
        filters: &[E::Filter],
        page: PageRequest,
        order: E::Order,
    ) -> Result<Page<E>> {
        let mut count_qb = QueryBuilder::new(format!("SELECT COUNT(*) FROM {}", E::TABLE));
        Self::push_where(&mut count_qb, filters);
        let total: i64 = count_qb
            .build_query_scalar()
            .fetch_one(&mut *self.conn)
            .await?;

        let mut qb = QueryBuilder::new(format!("SELECT {} FROM {}", E::COLUMNS, E::TABLE));
        Self::push_where(&mut qb, filters);
        qb.push(" ORDER BY ");
        qb.push(order.sql());
        qb.push(" LIMIT ");
        qb.push_bind(page.limit() as i64);
        qb.push(" OFFSET ");
        qb.push_bind(page.offset());

        let items = qb.build_query_as::<E>().fetch_all(&mut *self.conn).await?;
        Ok(Page { items, total })
    }

    /// 查询所有匹配记录（不分页）
    pub async fn get_all(&mut self, filters: &[E::Filter], order: E::Order) -> Result<Vec<E>> {
        let mut qb = QueryBuilder::new(format!("SELECT {} FROM {}", E::COLUMNS, E::TABLE));
        Self::push_where(&mut qb, filters);
        qb.push(" ORDER BY ");
        qb.push(order.sql());

        let items = qb.build_query_as::<E>().fetch_all(&mut *self.conn).await?;
        Ok(items)
    }

    /// 删除一行
    ///
    /// id 不存在时返回 NotFound；级联删除由数据库负责
    pub async fn delete_one(&mut self, id: Uuid) -> Result<()> {
        let sql = format!("DELETE FROM {} WHERE id = $1", E::TABLE);
        let result = sqlx::query(&sql).bind(id).execute(&mut *self.conn).await?;

        if result.rows_affected() == 0 {
            return Err(SocialError::NotFound {
                entity: E::KIND,
                id: id.to_string(),
            });
        }
        Ok(())
    }
}

impl<E: Insertable> Repository<'_, E> {
    /// 插入一行并返回完整实体
    ///
    /// id 与 created_at/updated_at 由数据库生成
    pub async fn create_one(&mut self, create: &E::Create) -> Result<E> {
        let mut qb = QueryBuilder::new(format!(
            "INSERT INTO {} ({}) VALUES (",
            E::TABLE,
            <E::Create as InsertValues>::COLUMNS
        ));
        create.push_values(&mut qb);
        qb.push(format!(") RETURNING {}", E::COLUMNS));

        let row = qb.build_query_as::<E>().fetch_one(&mut *self.conn).await?;
        Ok(row)
    }
}

impl<E: Updatable> Repository<'_, E> {
    /// 部分更新：只写入补丁中已设置的字段，其余保持不变
    ///
    /// id 不存在时返回 NotFound；空补丁退化为按 id 查询
    pub async fn update_one(&mut self, id: Uuid, patch: &E::Patch) -> Result<E> {
        let mut qb = QueryBuilder::new(format!("UPDATE {} SET ", E::TABLE));

        if !patch.push_assignments(&mut qb) {
            return self.get_by_id(id).await?.ok_or(SocialError::NotFound {
                entity: E::KIND,
                id: id.to_string(),
            });
        }

        qb.push(", updated_at = NOW() WHERE id = ");
        qb.push_bind(id);
        qb.push(format!(" RETURNING {}", E::COLUMNS));

        let row = qb
            .build_query_as::<E>()
            .fetch_optional(&mut *self.conn)
            .await?;

        row.ok_or(SocialError::NotFound {
            entity: E::KIND,
            id: id.to_string(),
        })
    }
}
