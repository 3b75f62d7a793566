//! Tenant database entity.

use sea_orm::entity::prelude::*;

use crate::domain::Tenant;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "tenants")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub name: String,
    #[sea_orm(unique)]
    pub code: String,
    pub plan_id: Option<Uuid>,
    pub status: String,
    pub created_by_platform_admin: Option<Uuid>,
    pub super_admin_id: Option<Uuid>,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::plan::Entity",
        from = "Column::PlanId",
        to = "super::plan::Column::Id",
        on_update = "NoAction",
        on_delete = "SetNull"
    )]
    Plan,
    #[sea_orm(
        belongs_to = "super::platform_admin::Entity",
        from = "Column::CreatedByPlatformAdmin",
        to = "super::platform_admin::Column::Id",
        on_update = "NoAction",
        on_delete = "SetNull"
    )]
    CreatedByPlatformAdmin,
    #[sea_orm(
        belongs_to = "super::admin::Entity",
        from = "Column::SuperAdminId",
        to = "super::admin::Column::Id",
        on_update = "NoAction",
        on_delete = "SetNull"
    )]
    SuperAdmin,
}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for Tenant {
    fn from(model: Model) -> Self {
        Tenant {
            id: model.id,
            name: model.name,
            code: model.code,
            plan_id: model.plan_id,
            status: model.status,
            created_by_platform_admin: model.created_by_platform_admin,
            super_admin_id: model.super_admin_id,
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}
