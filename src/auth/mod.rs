//
//  atlas-rest
//  auth/mod.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! # Authentication Module
//!
//! Credentials attached to every outbound request.
//!
//! ## Supported Methods
//!
//! - **Basic**: username with a password (Server/DC) or an API token (Cloud).
//! - **Token**: a bearer token, i.e. a Server/DC Personal Access Token or an
//!   OAuth access token.
//!
//! ## Example
//!
//! ```rust
//! use atlas_rest::auth::Credential;
//!
//! let cloud = Credential::basic("me@acme.com", "api-token");
//! assert_eq!(cloud.authorization_header(), "Basic bWVAYWNtZS5jb206YXBpLXRva2Vu");
//!
//! let server = Credential::token("personal-access-token");
//! assert_eq!(server.authorization_header(), "Bearer personal-access-token");
//! ```

use std::fmt;

use base64::engine::general_purpose::STANDARD;
use base64::Engine;

/// Credentials attached to every request as an `Authorization` header.
///
/// # Variants
///
/// * `Basic` - Username and password, or account email and API token
/// * `Token` - A bearer token
#[derive(Clone, PartialEq, Eq)]
pub enum Credential {
    Basic { username: String, password: String },
    Token { token: String },
}

impl Credential {
    /// Creates a Basic credential.
    ///
    /// # Parameters
    ///
    /// * `username` - Server username, or the account email on Cloud
    /// * `password` - Server password, or an API token on Cloud
    ///
    /// # Example
    ///
    /// ```rust
    /// use atlas_rest::auth::Credential;
    ///
    /// let credential = Credential::basic("alice", "secret");
    /// assert_eq!(credential.authorization_header(), "Basic YWxpY2U6c2VjcmV0");
    /// ```
    pub fn basic(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self::Basic {
            username: username.into(),
            password: password.into(),
        }
    }

    /// Creates a bearer-token credential.
    ///
    /// # Parameters
    ///
    /// * `token` - A Server/DC personal access token or an OAuth access token
    ///
    /// # Example
    ///
    /// ```rust
    /// use atlas_rest::auth::Credential;
    ///
    /// assert_eq!(Credential::token("pat").authorization_header(), "Bearer pat");
    /// ```
    pub fn token(token: impl Into<String>) -> Self {
        Self::Token {
            token: token.into(),
        }
    }

    /// The `Authorization` header value for this credential.
    pub fn authorization_header(&self) -> String {
        match self {
            Self::Basic { username, password } => {
                let encoded = STANDARD.encode(format!("{username}:{password}"));
                format!("Basic {encoded}")
            }
            Self::Token { token } => format!("Bearer {token}"),
        }
    }
}

// Secrets stay out of logs.
impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Basic { username, .. } => f
                .debug_struct("Basic")
                .field("username", username)
                .field("password", &"***")
                .finish(),
            Self::Token { .. } => f.debug_struct("Token").field("token", &"***").finish(),
        }
    }
}
