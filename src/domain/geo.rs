//! Geographic reference data: regions, states and municipalities.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Regiao {
    pub id: Uuid,
    pub nome: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Estado {
    pub id: Uuid,
    /// Two-letter abbreviation, e.g. `SP`.
    pub uf: String,
    pub nome: String,
    pub regiao_id: Uuid,
}

/// Municipality keyed by its IBGE code.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Cidade {
    pub ibge: String,
    pub uf: String,
    pub nome: String,
}

impl Cidade {
    #[must_use]
    pub fn new(ibge: impl Into<String>, uf: impl Into<String>, nome: impl Into<String>) -> Self {
        Self {
            ibge: ibge.into(),
            uf: uf.into(),
            nome: nome.into(),
        }
    }
}

/// Length of an IBGE municipality code.
pub const IBGE_CODE_LEN: usize = 7;

/// Whether `code` has the shape of a municipality code: seven ASCII digits, not all zero.
#[must_use]
pub fn is_ibge_code(code: &str) -> bool {
    code.len() == IBGE_CODE_LEN
        && code.bytes().all(|b| b.is_ascii_digit())
        && code.bytes().any(|b| b != b'0')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ibge_code_shape() {
        assert!(is_ibge_code("3557105"));
        assert!(is_ibge_code("5300108"));
        assert!(!is_ibge_code(""));
        assert!(!is_ibge_code("0"));
        assert!(!is_ibge_code("00000"));
        assert!(!is_ibge_code("0000000"));
        assert!(!is_ibge_code("ab2c3"));
        assert!(!is_ibge_code("355710a"));
        assert!(!is_ibge_code("35571050"));
    }
}
