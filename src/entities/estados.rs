use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "estados")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,

    /// Two-letter state abbreviation
    #[sea_orm(unique)]
    pub uf: String,

    pub nome: String,

    pub regiao_id: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::regioes::Entity",
        from = "Column::RegiaoId",
        to = "super::regioes::Column::Id",
        on_update = "NoAction",
        on_delete = "NoAction"
    )]
    Regioes,
    #[sea_orm(has_many = "super::cidades::Entity")]
    Cidades,
}

impl Related<super::regioes::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Regioes.def()
    }
}

impl Related<super::cidades::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Cidades.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
