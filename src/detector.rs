use crate::framework::Framework;
use crate::source::{AnnotationModel, SourceModel};
use crate::taxonomy::AnnotationTaxonomy;
use log::debug;
use std::collections::HashSet;

/// Framework detector for identifying the web framework a source model was written against.
///
/// The `FrameworkDetector` inspects the annotations on classes and methods and
/// matches them against the entry and mapping annotations of each built-in
/// taxonomy. Annotations shared by several frameworks count for none of them.
///
/// Currently supports detection of:
/// - Spring MVC (via `@RestController`, `@GetMapping`, ...)
/// - JAX-RS (via `@Path`, `@GET`, ...)
pub struct FrameworkDetector;

/// Result of framework detection.
///
/// Contains the list of all detected frameworks, in the order of
/// [`FrameworkDetector::CANDIDATES`].
pub struct DetectionResult {
    /// List of detected frameworks
    pub frameworks: Vec<Framework>,
}

impl DetectionResult {
    /// The detected framework, when detection was unambiguous
    pub fn single(&self) -> Option<Framework> {
        match self.frameworks.as_slice() {
            [framework] => Some(*framework),
            _ => None,
        }
    }
}

impl FrameworkDetector {
    pub const CANDIDATES: [Framework; 2] = [Framework::Spring, Framework::JaxRs];

    fn marker_annotations(framework: Framework) -> HashSet<String> {
        let taxonomy = match framework {
            Framework::Spring => AnnotationTaxonomy::spring(),
            Framework::JaxRs => AnnotationTaxonomy::jaxrs(),
        };
        taxonomy
            .entry_annotations
            .into_iter()
            .chain(taxonomy.mapping_annotations.into_iter().map(|m| m.name))
            .collect()
    }

    /// Detects frameworks used in the provided source model.
    ///
    /// Both class annotations and method annotations are examined, so a
    /// JAX-RS implementation class whose resource interface is in the model
    /// is still recognized.
    ///
    /// # Arguments
    ///
    /// * `model` - The merged source model to analyze
    ///
    /// # Returns
    ///
    /// Returns a `DetectionResult` containing all detected frameworks.
    ///
    /// # Example
    ///
    /// ```no_run
    /// use apidoc_synth::detector::FrameworkDetector;
    /// use apidoc_synth::source::SourceModel;
    ///
    /// let result = FrameworkDetector::detect(&SourceModel::new(Vec::new()));
    /// println!("Detected {} framework(s)", result.frameworks.len());
    /// ```
    pub fn detect(model: &SourceModel) -> DetectionResult {
        debug!("Detecting frameworks in {} classes", model.len());

        let markers: Vec<(Framework, HashSet<String>)> = Self::CANDIDATES
            .iter()
            .map(|framework| (*framework, Self::marker_annotations(*framework)))
            .collect();

        let mut detected = HashSet::new();
        for class in model.classes() {
            let annotations = class
                .annotations
                .iter()
                .chain(class.methods.iter().flat_map(|m| m.annotations.iter()));
            for annotation in annotations {
                Self::check_annotation(annotation, &markers, &mut detected);
            }
        }

        let frameworks: Vec<Framework> = Self::CANDIDATES
            .iter()
            .copied()
            .filter(|f| detected.contains(f))
            .collect();
        debug!("Detected frameworks: {:?}", frameworks);

        DetectionResult { frameworks }
    }

    fn check_annotation(
        annotation: &AnnotationModel,
        markers: &[(Framework, HashSet<String>)],
        detected: &mut HashSet<Framework>,
    ) {
        let name = annotation.simple_name();
        let mut owners = markers.iter().filter(|(_, names)| names.contains(name));
        if let (Some((framework, _)), None) = (owners.next(), owners.next()) {
            detected.insert(*framework);
        }
    }
}
