use crate::framework::FrameworkTemplate;
use crate::taxonomy::{AnnotationRegistry, AnnotationTaxonomy};

/// Spring MVC template.
///
/// Spring needs nothing beyond its annotation table: controllers are marked
/// with `@RestController`/`@Controller` and every mapping annotation carries
/// its own path and verb.
pub struct SpringTemplate {
    registry: AnnotationRegistry,
}

impl SpringTemplate {
    pub fn new() -> Self {
        Self {
            registry: AnnotationRegistry::new(AnnotationTaxonomy::spring()),
        }
    }
}

impl Default for SpringTemplate {
    fn default() -> Self {
        Self::new()
    }
}

impl FrameworkTemplate for SpringTemplate {
    fn name(&self) -> &str {
        "spring"
    }

    fn registry(&self) -> &AnnotationRegistry {
        &self.registry
    }
}
