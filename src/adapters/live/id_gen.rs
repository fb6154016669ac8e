//! Random identifiers for publisher configuration areas.

use uuid::Uuid;

use crate::ports::IdGenerator;

/// Produces hyphen-free v4 UUIDs, safe to use as directory names.
#[derive(Debug, Default)]
pub struct UuidGenerator;

impl IdGenerator for UuidGenerator {
    fn generate_id(&self) -> String {
        Uuid::new_v4().simple().to_string()
    }
}
