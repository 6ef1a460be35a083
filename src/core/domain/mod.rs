//! Domain types.

mod config_item;
mod descriptor;
mod external;
mod image;
mod rbac;

pub use config_item::{is_required, ConfigurationItem, Location, PortalField, PortalInput};
pub use descriptor::{AppType, Authentication, BuildConfig, Database, Descriptor, HealthCheck};
pub use external::ExternalManifest;
pub use image::ImageReference;
pub use rbac::{Permission, RbacDocument, Role};
