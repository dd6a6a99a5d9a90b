use crate::entities::{prelude::*, tokens_acesso};
use sea_orm_migration::prelude::*;
use sea_orm_migration::sea_orm::Schema;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let backend = manager.get_database_backend();
        let schema = Schema::new(backend);

        manager
            .create_table(
                schema
                    .create_table_from_entity(Usuarios)
                    .if_not_exists()
                    .to_owned(),
            )
            .await?;

        // Tokens are owned by their user and go away with it (ON DELETE CASCADE).
        manager
            .create_table(
                schema
                    .create_table_from_entity(TokensAcesso)
                    .if_not_exists()
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_tokens_acesso_usuario_id")
                    .table(TokensAcesso)
                    .col(tokens_acesso::Column::UsuarioId)
                    .if_not_exists()
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(TokensAcesso).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Usuarios).to_owned())
            .await?;

        Ok(())
    }
}
