use crate::params::ApiParam;
use crate::taxonomy::BindingKind;
use crate::type_resolver::{field_required, PrimitiveType, TypeKind, TypeRef, TypeResolver};
use indexmap::IndexMap;
use log::debug;
use serde::{Deserialize, Serialize};
use serde_json::Value;

const SCHEMA_REF_PREFIX: &str = "#/components/schemas/";

/// Schema generator - converts resolved types to structural schemas
pub struct SchemaGenerator<'a> {
    /// Type resolver for looking up class definitions
    resolver: &'a TypeResolver<'a>,
    /// Named schemas generated so far, in generation order
    schemas: IndexMap<String, Schema>,
}

/// Structural schema of a request or response type
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Schema {
    /// The type of the schema (string, integer, object, array, etc.)
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub schema_type: Option<String>,
    /// Format for scalar types (e.g., "int32", "int64", "date-time", "binary")
    #[serde(skip_serializing_if = "Option::is_none")]
    pub format: Option<String>,
    /// Properties for object types, in field order
    #[serde(skip_serializing_if = "Option::is_none")]
    pub properties: Option<IndexMap<String, Schema>>,
    /// Required property names for object types
    #[serde(skip_serializing_if = "Option::is_none")]
    pub required: Option<Vec<String>>,
    /// Items schema for array types
    #[serde(skip_serializing_if = "Option::is_none")]
    pub items: Option<Box<Schema>>,
    /// Value schema for map types
    #[serde(rename = "additionalProperties", skip_serializing_if = "Option::is_none")]
    pub additional_properties: Option<Box<Schema>>,
    /// Enum values for enum types
    #[serde(rename = "enum", skip_serializing_if = "Option::is_none")]
    pub enum_values: Option<Vec<Value>>,
    /// Reference to a named schema
    #[serde(rename = "$ref", skip_serializing_if = "Option::is_none")]
    pub reference: Option<String>,
}

impl Schema {
    fn typed(schema_type: &str, format: Option<&str>) -> Self {
        Self {
            schema_type: Some(schema_type.to_string()),
            format: format.map(str::to_string),
            ..Self::default()
        }
    }

    fn reference(name: &str) -> Self {
        Self {
            reference: Some(format!("{}{}", SCHEMA_REF_PREFIX, name)),
            ..Self::default()
        }
    }

    fn array(items: Schema) -> Self {
        Self {
            items: Some(Box::new(items)),
            ..Self::typed("array", None)
        }
    }
}

/// Schema of a non-body request parameter
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParameterSchema {
    /// Parameter name
    pub name: String,
    /// Parameter location (path, query, header)
    #[serde(rename = "in")]
    pub location: String,
    /// Whether the parameter is required
    pub required: bool,
    /// Schema for the parameter
    pub schema: Schema,
}

/// Name under which a composite instantiation is registered, e.g. `PageOfUser`
pub fn schema_name(ty: &TypeRef) -> String {
    let mut name = ty.simple_name().to_string();
    for arg in &ty.args {
        name.push_str("Of");
        name.push_str(&schema_name(arg));
    }
    name
}

impl<'a> SchemaGenerator<'a> {
    /// Create a new SchemaGenerator over a TypeResolver
    pub fn new(resolver: &'a TypeResolver<'a>) -> Self {
        debug!("Initializing SchemaGenerator");
        Self {
            resolver,
            schemas: IndexMap::new(),
        }
    }

    /// Generate a schema for a type, registering named schemas for every
    /// composite and enum it reaches
    pub fn generate_schema(&mut self, ty: &TypeRef) -> Schema {
        debug!("Generating schema for type: {}", ty);

        match self.resolver.classify(ty) {
            TypeKind::Primitive(primitive) => primitive_to_schema(primitive),
            TypeKind::File => Schema::typed("string", Some("binary")),
            TypeKind::Collection(element) | TypeKind::Array(element) => Schema::array(self.generate_schema(&element)),
            TypeKind::Map(_, value) => Schema {
                additional_properties: Some(Box::new(self.generate_schema(&value))),
                ..Schema::typed("object", None)
            },
            TypeKind::Enum => {
                let unwrapped = self.resolver.unwrap(ty);
                let name = schema_name(&unwrapped);
                self.generate_enum_schema(&name, &unwrapped);
                Schema::reference(&name)
            }
            TypeKind::Object => {
                let unwrapped = self.resolver.unwrap(ty);
                let name = schema_name(&unwrapped);
                self.generate_object_schema(&name, &unwrapped);
                Schema::reference(&name)
            }
            TypeKind::Unknown => {
                debug!("Unknown type: {}, using object placeholder", ty);
                Schema::typed("object", None)
            }
        }
    }

    /// Generate the schema for a composite type and add it to the schemas collection
    fn generate_object_schema(&mut self, name: &str, ty: &TypeRef) {
        // Check if already generated (or being generated further up the stack)
        if self.schemas.contains_key(name) {
            debug!("Schema for {} already exists", name);
            return;
        }

        debug!("Generating object schema for: {}", name);
        self.schemas.insert(name.to_string(), Schema::typed("object", None));

        let registry = self.resolver.registry();
        let mut properties = IndexMap::new();
        let mut required = Vec::new();
        for field in self.resolver.fields_of(ty) {
            let property = self.generate_schema(&field.ty);
            if field_required(field.field, &[], registry) {
                required.push(field.name.clone());
            }
            properties.insert(field.name, property);
        }

        let schema = Schema {
            properties: Some(properties),
            required: if required.is_empty() { None } else { Some(required) },
            ..Schema::typed("object", None)
        };
        self.schemas.insert(name.to_string(), schema);
    }

    /// Generate the schema for an enum type and add it to the schemas collection
    fn generate_enum_schema(&mut self, name: &str, ty: &TypeRef) {
        if self.schemas.contains_key(name) {
            debug!("Schema for {} already exists", name);
            return;
        }

        debug!("Generating enum schema for: {}", name);
        let values = self.resolver.enum_values(ty);
        let schema_type = if values.iter().all(Value::is_number) && !values.is_empty() {
            "integer"
        } else {
            "string"
        };
        let schema = Schema {
            enum_values: Some(values),
            ..Schema::typed(schema_type, None)
        };
        self.schemas.insert(name.to_string(), schema);
    }

    /// Generate a parameter schema for a path, query or header parameter
    pub fn generate_parameter_schema(&mut self, param: &ApiParam, ty: &TypeRef) -> ParameterSchema {
        debug!("Generating parameter schema for: {}", param.field);

        let location = match param.binding {
            BindingKind::Path => "path",
            BindingKind::Header => "header",
            _ => "query",
        };

        ParameterSchema {
            name: param.field.clone(),
            location: location.to_string(),
            required: param.required,
            schema: self.generate_schema(ty),
        }
    }

    /// Get all generated schemas
    pub fn get_schemas(&self) -> &IndexMap<String, Schema> {
        &self.schemas
    }

    pub fn into_schemas(self) -> IndexMap<String, Schema> {
        self.schemas
    }
}

/// Convert a primitive type to a schema
fn primitive_to_schema(primitive: PrimitiveType) -> Schema {
    let (schema_type, format) = match primitive {
        PrimitiveType::String | PrimitiveType::Char => ("string", None),
        PrimitiveType::Byte | PrimitiveType::Short | PrimitiveType::Int => ("integer", Some("int32")),
        PrimitiveType::Long | PrimitiveType::BigInteger => ("integer", Some("int64")),
        PrimitiveType::Float => ("number", Some("float")),
        PrimitiveType::Double => ("number", Some("double")),
        PrimitiveType::BigDecimal => ("number", None),
        PrimitiveType::Boolean => ("boolean", None),
        PrimitiveType::Date => ("string", Some("date")),
        PrimitiveType::DateTime => ("string", Some("date-time")),
        PrimitiveType::Time => ("string", Some("time")),
        PrimitiveType::Uuid => ("string", Some("uuid")),
    };
    Schema::typed(schema_type, format)
}
