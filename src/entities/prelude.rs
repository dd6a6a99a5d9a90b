pub use super::cidades::Entity as Cidades;
pub use super::estados::Entity as Estados;
pub use super::regioes::Entity as Regioes;
pub use super::tokens_acesso::Entity as TokensAcesso;
pub use super::usuarios::Entity as Usuarios;
