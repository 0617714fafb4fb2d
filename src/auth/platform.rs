use oso::PolarClass;
use serde::{Deserialize, Serialize};

/// Resource standing for the load board as a whole, for actions that do not
/// target an existing load or bid (browsing, posting).
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct Platform {
    name: String,
}

impl Platform {
    pub fn load_board() -> Self {
        Self {
            name: "load_board".into(),
        }
    }
}

impl PolarClass for Platform {
    fn get_polar_class_builder() -> oso::ClassBuilder<Platform> {
        oso::Class::builder()
            .name("Platform")
            .add_attribute_getter("name", |recv: &Platform| recv.name.clone())
            .add_class_method("load_board", Platform::load_board)
    }

    fn get_polar_class() -> oso::Class {
        let builder = Platform::get_polar_class_builder();
        builder.build()
    }
}
