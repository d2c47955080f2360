//! Sequential merge of per-class documents: global method ids, tag folders
//! and final folder ordering.

use crate::doc_builder::{ApiDoc, ApiMethodDoc, ClassDoc, DocTree};
use log::debug;

pub struct DocAggregator {
    sort_by_title: bool,
}

impl DocAggregator {
    pub fn new(sort_by_title: bool) -> Self {
        Self { sort_by_title }
    }

    /// Merge worker results, in discovery order, into the final tree
    pub fn aggregate(&self, class_docs: Vec<ClassDoc>) -> DocTree {
        let mut tree = DocTree::default();
        let mut docs = Vec::with_capacity(class_docs.len());
        let mut next_id = 1u32;

        for class_doc in class_docs {
            let mut doc = class_doc.doc;
            next_id = assign_method_ids(&mut doc.methods, next_id);
            for (name, schema) in class_doc.schemas {
                tree.schemas.entry(name).or_insert(schema);
            }
            tree.diagnostics.extend(class_doc.diagnostics);
            docs.push(doc);
        }

        let mut docs = apply_class_tags(docs);
        apply_method_tags(&mut docs);
        tree.docs = sort_folders(docs, self.sort_by_title);
        debug!("Aggregated {} folders", tree.docs.len());
        tree
    }
}

/// Number methods from `next_id`; returns the next free id
pub fn assign_method_ids(methods: &mut [ApiMethodDoc], mut next_id: u32) -> u32 {
    for method in methods {
        method.id = next_id;
        next_id += 1;
    }
    next_id
}

fn add_method(folder: &mut ApiDoc, method: &ApiMethodDoc) {
    if folder.methods.iter().any(|m| m.id == method.id) {
        return;
    }
    let order = folder.methods.len() as u32 + 1;
    folder.methods.push(ApiMethodDoc {
        order,
        ..method.clone()
    });
}

/// Class-level `@tag`s: every tagged class also contributes its endpoints
/// to a folder per tag. Class folders stay in place.
pub fn apply_class_tags(docs: Vec<ApiDoc>) -> Vec<ApiDoc> {
    let mut folders: Vec<ApiDoc> = Vec::with_capacity(docs.len());
    for doc in docs {
        let tags: Vec<String> = doc
            .tags
            .iter()
            .map(|t| t.trim().to_string())
            .filter(|t| !t.is_empty() && *t != doc.name)
            .collect();
        let methods = doc.methods.clone();
        let template = ApiDoc {
            order: None,
            custom_order: false,
            author: None,
            methods: Vec::new(),
            ..doc.clone()
        };

        match folders.iter().position(|f| f.name == doc.name && f.order.is_none()) {
            // a tag folder already claimed this name: the class takes it over
            Some(pos) => {
                let tag_methods = std::mem::take(&mut folders[pos].methods);
                let mut class_folder = doc;
                for method in &tag_methods {
                    add_method(&mut class_folder, method);
                }
                folders[pos] = class_folder;
            }
            None => folders.push(doc),
        }

        for tag in tags {
            let folder = match folders.iter().position(|f| f.name == tag) {
                Some(pos) => &mut folders[pos],
                None => {
                    folders.push(ApiDoc {
                        name: tag.clone(),
                        alias: tag.clone(),
                        tags: vec![tag.clone()],
                        desc: tag.clone(),
                        ..template.clone()
                    });
                    let last = folders.len() - 1;
                    &mut folders[last]
                }
            };
            for method in &methods {
                add_method(folder, method);
            }
        }
    }
    folders
}

/// Method-level `@tag`s: each tagged endpoint is also listed under a folder
/// per tag, created on first use.
pub fn apply_method_tags(folders: &mut Vec<ApiDoc>) {
    let snapshot: Vec<(usize, Vec<ApiMethodDoc>)> = folders
        .iter()
        .enumerate()
        .map(|(idx, folder)| (idx, folder.methods.clone()))
        .collect();

    for (source_idx, methods) in snapshot {
        for method in methods {
            for tag in method.tags.iter().map(|t| t.trim()).filter(|t| !t.is_empty()) {
                if folders[source_idx].name == tag {
                    continue;
                }
                match folders.iter_mut().find(|f| f.name == tag) {
                    Some(folder) => add_method(folder, &method),
                    None => {
                        let folder = ApiDoc::tag_folder(tag, &folders[source_idx], method.clone());
                        folders.push(folder);
                    }
                }
            }
        }
    }
}

/// Final folder order.
///
/// Folders without an order (tag folders) first receive continuation values
/// after the highest existing order. Then: by name when `sort_by_title`, by
/// order (renumbered from 1) when any folder has an explicit order, else
/// unchanged.
pub fn sort_folders(mut folders: Vec<ApiDoc>, sort_by_title: bool) -> Vec<ApiDoc> {
    let mut next = folders.iter().filter_map(|f| f.order).max().unwrap_or(0);
    for folder in folders.iter_mut().filter(|f| f.order.is_none()) {
        next += 1;
        folder.order = Some(next);
    }

    if sort_by_title {
        folders.sort_by(|a, b| a.name.cmp(&b.name));
    } else if folders.iter().any(|f| f.custom_order) {
        folders.sort_by_key(|f| f.order);
        for (idx, folder) in folders.iter_mut().enumerate() {
            folder.order = Some(idx as u32 + 1);
        }
    }
    folders
}
