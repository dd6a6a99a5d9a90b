pub mod reference {

    pub const TOTAL_REGIOES: usize = 5;

    pub const TOTAL_ESTADOS: usize = 27;
}

pub mod auth {

    pub const TOKEN_TTL_HOURS: u32 = 8;

    pub const MIN_PASSWORD_LENGTH: usize = 8;

    /// Hex characters in a generated access token
    pub const TOKEN_LENGTH: usize = 64;
}

pub mod limits {

    pub const MAX_NOME_LENGTH: usize = 100;

    pub const MAX_EMAIL_LENGTH: usize = 100;
}
