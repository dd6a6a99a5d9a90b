use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "regioes")]
pub struct Model {
    /// UUID, generated by the application
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,

    #[sea_orm(unique)]
    pub nome: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::estados::Entity")]
    Estados,
}

impl Related<super::estados::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Estados.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
