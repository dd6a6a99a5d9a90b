mod geo;
mod init;
mod seed;
mod usuario;

pub use geo::{cmd_cidade, cmd_cidades, cmd_estados, cmd_regioes};
pub use init::cmd_init;
pub use seed::cmd_seed;
pub use usuario::{cmd_login, cmd_usuario_add, cmd_usuario_show, cmd_whoami};
