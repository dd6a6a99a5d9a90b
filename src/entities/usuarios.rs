use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "usuarios")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,

    pub nome: String,

    /// Lowercased address
    #[sea_orm(unique)]
    pub email: String,

    /// Argon2id password hash
    pub hash_senha: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::tokens_acesso::Entity")]
    TokensAcesso,
}

impl Related<super::tokens_acesso::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::TokensAcesso.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
