use crate::error::ModelError;
use mirror_types::{Access, PrimitiveKind};
use serde::{Deserialize, Serialize};
use std::{fs, path::Path};

pub const OBJECT: &str = "java.lang.Object";
pub const STRING: &str = "java.lang.String";

/// A host object model as written in a model file.
///
/// ```json
/// {
///   "version": "v1_8_R3",
///   "types": [
///     { "name": "net.minecraft.server.v1_8_R3.Entity",
///       "fields": [{ "name": "locX", "access": "restricted" }],
///       "methods": [{ "name": "setLocation", "parameters": ["double", "double"] }] }
///   ]
/// }
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct HostModel {
    /// Version token reported by the host.
    #[serde(default)]
    pub version: Option<String>,
    /// Used to derive the version token when `version` is absent.
    #[serde(default)]
    pub implementation_package: Option<String>,
    /// Adds `java.lang.Object`, `java.lang.String`, the primitives and their
    /// wrappers unless the model declares them itself.
    #[serde(default = "default_true")]
    pub include_builtins: bool,
    #[serde(default)]
    pub types: Vec<TypeModel>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TypeModel {
    /// Fully qualified name.
    pub name: String,
    #[serde(default)]
    pub supertypes: Vec<String>,
    /// Set on unboxed value types such as `int`.
    #[serde(default)]
    pub primitive: Option<PrimitiveKind>,
    /// Set on wrapper types such as `java.lang.Integer`.
    #[serde(default)]
    pub boxes: Option<PrimitiveKind>,
    #[serde(default)]
    pub fields: Vec<FieldModel>,
    #[serde(default)]
    pub methods: Vec<MethodModel>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FieldModel {
    pub name: String,
    #[serde(default)]
    pub access: Access,
    /// The host refuses to unlock this member.
    #[serde(default)]
    pub locked: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MethodModel {
    pub name: String,
    /// Qualified parameter type names, in order.
    #[serde(default)]
    pub parameters: Vec<String>,
    #[serde(default)]
    pub access: Access,
    #[serde(default)]
    pub locked: bool,
}

fn default_true() -> bool {
    true
}

impl HostModel {
    pub fn new(version: impl Into<String>) -> Self {
        Self {
            version: Some(version.into()),
            include_builtins: true,
            ..Default::default()
        }
    }

    pub fn from_json(text: &str) -> Result<Self, ModelError> {
        Ok(serde_json::from_str(text)?)
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ModelError> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|source| ModelError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&text)
    }

    pub fn with_type(mut self, ty: TypeModel) -> Self {
        self.types.push(ty);
        self
    }

    /// The built-in types not already declared by the model.
    pub(crate) fn missing_builtins(&self) -> Vec<TypeModel> {
        if !self.include_builtins {
            return Vec::new();
        }
        builtin_types()
            .into_iter()
            .filter(|b| !self.types.iter().any(|t| t.name == b.name))
            .collect()
    }
}

impl TypeModel {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    pub fn extends(mut self, supertype: impl Into<String>) -> Self {
        self.supertypes.push(supertype.into());
        self
    }

    pub fn field(mut self, name: impl Into<String>, access: Access) -> Self {
        self.fields.push(FieldModel {
            name: name.into(),
            access,
            locked: false,
        });
        self
    }

    pub fn method<S: Into<String>>(
        mut self,
        name: impl Into<String>,
        parameters: impl IntoIterator<Item = S>,
        access: Access,
    ) -> Self {
        self.methods.push(MethodModel {
            name: name.into(),
            parameters: parameters.into_iter().map(Into::into).collect(),
            access,
            locked: false,
        });
        self
    }
}

fn builtin_types() -> Vec<TypeModel> {
    let mut types = vec![TypeModel::new(OBJECT), TypeModel::new(STRING).extends(OBJECT)];
    for kind in PrimitiveKind::ALL {
        types.push(TypeModel {
            primitive: Some(kind),
            ..TypeModel::new(kind.primitive_name())
        });
        types.push(TypeModel {
            boxes: Some(kind),
            ..TypeModel::new(kind.boxed_name()).extends(OBJECT)
        });
    }
    types
}
