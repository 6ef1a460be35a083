//! Test fixtures and constants.

/// A complete webapp descriptor.
pub const WEBAPP_DESCRIPTOR: &str = r#"{
  "key": "miso-controller",
  "displayName": "Miso Controller",
  "description": "Control plane for the platform",
  "type": "webapp",
  "image": "devflowiseacr.azurecr.io/aifabrix/miso-controller:latest",
  "registryMode": "acr",
  "port": 3000,
  "requiresDatabase": true,
  "requiresRedis": true,
  "requiresStorage": false,
  "databases": [{"name": "miso"}],
  "healthCheck": {"path": "/health", "interval": 30},
  "authentication": {"type": "azure", "enableSSO": true, "requiredRoles": ["aifabrix-user"]},
  "build": {"language": "typescript", "envOutputPath": "../.env"},
  "configuration": [
    {"name": "DATABASE_URL", "value": "databases-miso-0-urlKeyVault", "location": "keyvault", "required": true},
    {"name": "REDIS_URL", "value": "redis://${REDIS_HOST}:6379", "location": "variable"},
    {"name": "PORT", "value": "3000", "location": "variable"}
  ],
  "roles": [
    {"name": "AI Fabrix User", "value": "aifabrix-user", "description": "Regular users"}
  ],
  "permissions": [
    {"name": "controller:read", "roles": ["aifabrix-user"], "description": "Read access"}
  ]
}
"#;

/// A descriptor whose image has no registry and no tag.
pub const MINIMAL_DESCRIPTOR: &str = r#"{
  "key": "myapp",
  "displayName": "My App",
  "type": "webapp",
  "image": "myapp",
  "port": 8080,
  "configuration": [{"name": "NODE_ENV", "value": "production", "location": "variable"}]
}
"#;

/// An external data source document.
pub const DATASOURCE: &str = r#"{
  "key": "hubspot-contacts",
  "systemKey": "hubspot",
  "entityKey": "contact",
  "description": "HubSpot contacts",
  "fieldMappings": {"attributes": {"email": {"expression": "{{properties.email}}"}}},
  "exposed": {"attributes": ["email"]},
  "sync": {"enabled": true, "schedule": "0 * * * *"}
}
"#;

/// [`DATASOURCE`] with only the description changed (keys reordered).
pub const DATASOURCE_DESCRIPTION_CHANGED: &str = r#"{
  "systemKey": "hubspot",
  "key": "hubspot-contacts",
  "entityKey": "contact",
  "description": "Contacts synchronised from HubSpot",
  "sync": {"schedule": "0 * * * *", "enabled": true},
  "exposed": {"attributes": ["email"]},
  "fieldMappings": {"attributes": {"email": {"expression": "{{properties.email}}"}}}
}
"#;

/// [`DATASOURCE`] with sync disabled.
pub const DATASOURCE_SYNC_DISABLED: &str = r#"{
  "key": "hubspot-contacts",
  "systemKey": "hubspot",
  "entityKey": "contact",
  "description": "HubSpot contacts",
  "fieldMappings": {"attributes": {"email": {"expression": "{{properties.email}}"}}},
  "exposed": {"attributes": ["email"]},
  "sync": {"enabled": false, "schedule": "0 * * * *"}
}
"#;

/// An external system manifest with one data source.
pub const EXTERNAL_MANIFEST: &str = r#"{
  "application": {
    "key": "hubspot",
    "displayName": "HubSpot",
    "type": "openapi",
    "openapi": {"documentKey": "hubspot-v3"}
  },
  "dataSources": [
    {"key": "hubspot-contacts", "systemKey": "hubspot", "entityKey": "contact"}
  ]
}
"#;

/// A rule table that treats every `sync` change as a trigger.
pub const STRICT_RULES: &str = r#"{
  "application": {"triggerPaths": ["key"], "overridablePaths": ["configuration.items.value"]},
  "externalSystem": {"triggerPaths": ["key"], "overridablePaths": ["configuration.items.value"]},
  "externalDataSource": {"triggerPaths": ["key", "sync"], "overridablePaths": ["exposed.omit"]}
}
"#;

/// A 64-hex secret key for sealing.
pub const HEX_SECRET_KEY: &str =
    "000102030405060708090a0b0c0d0e0f101112131415161718191a1b1c1d1e1f";
