//! Embeddable secrets
//!
//! Flattens a `StageSecrets` record into the variable-name → value map
//! injected into a running process. Later layers win on name collisions:
//! urls, then custom, then the derived service variables.

use crate::stage::StageSecrets;
use std::collections::HashMap;

/// Flatten urls, custom values and derived service variables into one map
pub fn to_embeddable_secrets(secrets: &StageSecrets) -> HashMap<String, String> {
    let mut flat = HashMap::new();

    for (name, value) in &secrets.urls {
        flat.insert(name.clone(), value.clone());
    }
    for (name, value) in &secrets.custom {
        flat.insert(name.clone(), value.clone());
    }

    if let Some(postgres) = &secrets.services.postgres {
        flat.insert("POSTGRES_USER".to_string(), postgres.user.clone());
        flat.insert("POSTGRES_PASSWORD".to_string(), postgres.password.clone());
        flat.insert("POSTGRES_DB".to_string(), postgres.database.clone());
        flat.insert("POSTGRES_HOST".to_string(), postgres.host.clone());
        flat.insert("POSTGRES_PORT".to_string(), postgres.port.to_string());
    }

    if let Some(redis) = &secrets.services.redis {
        if let Some(password) = &redis.password {
            flat.insert("REDIS_PASSWORD".to_string(), password.clone());
        }
        flat.insert("REDIS_HOST".to_string(), redis.host.clone());
        flat.insert("REDIS_PORT".to_string(), redis.port.to_string());
    }

    if let Some(rabbitmq) = &secrets.services.rabbitmq {
        flat.insert("RABBITMQ_USER".to_string(), rabbitmq.user.clone());
        flat.insert("RABBITMQ_PASSWORD".to_string(), rabbitmq.password.clone());
        flat.insert("RABBITMQ_HOST".to_string(), rabbitmq.host.clone());
        flat.insert("RABBITMQ_PORT".to_string(), rabbitmq.port.to_string());
        flat.insert("RABBITMQ_VHOST".to_string(), rabbitmq.vhost.clone());
    }

    flat
}
