pub mod prelude;

pub mod cidades;
pub mod estados;
pub mod regioes;
pub mod tokens_acesso;
pub mod usuarios;
