use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "cidades")]
pub struct Model {
    /// IBGE municipality code (7 digits)
    #[sea_orm(primary_key, auto_increment = false)]
    pub ibge: String,

    pub uf: String,

    pub nome: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::estados::Entity",
        from = "Column::Uf",
        to = "super::estados::Column::Uf",
        on_update = "NoAction",
        on_delete = "NoAction"
    )]
    Estados,
}

impl Related<super::estados::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Estados.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
