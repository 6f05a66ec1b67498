use oso::PolarClass;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// The single journal every record belongs to; the resource all
/// permissions are checked against.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Journal {
    id: Uuid,
}

impl Journal {
    pub fn default() -> Self {
        Self { id: Uuid::nil() }
    }
}

impl PolarClass for Journal {
    fn get_polar_class_builder() -> oso::ClassBuilder<Journal> {
        oso::Class::builder()
            .name("Journal")
            .add_attribute_getter("id", |recv: &Journal| recv.id.clone())
            .add_class_method("default", Journal::default)
    }

    fn get_polar_class() -> oso::Class {
        let builder = Journal::get_polar_class_builder();
        builder.build()
    }
}
