//! GKM secret and credential lifecycle
//!
//! Stage-scoped secret generation, caching, masking and at-rest
//! encryption, independent of the state store's remote-ID bookkeeping.
//!
//! - Generated secrets are cached per (app, name) in the deployment
//!   state and never rotated implicitly.
//! - Operator-facing output always goes through [`mask_password`].
//! - The flattened, injectable form of a stage's secrets comes from
//!   [`to_embeddable_secrets`] and can be sealed with AES-256-GCM for
//!   embedding into build artifacts.

pub mod crypto;
pub mod embed;
pub mod error;
pub mod manager;
pub mod stage;

pub use crypto::{
    MASTER_KEY_ENV, SealedSecrets, decrypt_secrets, decrypt_secrets_from_env, encrypt_secrets,
    generate_master_key,
};
pub use embed::to_embeddable_secrets;
pub use error::{Result, SecretError};
pub use manager::{generate_secret, get_or_generate_secret, mask_password};
pub use stage::{
    PostgresSecrets, RabbitmqSecrets, RedisSecrets, SecretsStore, ServiceSecrets, StageSecrets,
};
