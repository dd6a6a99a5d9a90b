pub mod cidade;
pub mod estado;
pub mod regiao;
pub mod usuario;

pub use cidade::CidadeRepository;
pub use estado::EstadoRepository;
pub use regiao::RegiaoRepository;
pub use usuario::UsuarioRepository;
