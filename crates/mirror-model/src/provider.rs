use crate::{
    calls::{CallCounts, ProviderCalls},
    error::ModelError,
    model::{HostModel, OBJECT, TypeModel},
};
use mirror_resolver::{ReflectionProvider, UnlockTarget};
use mirror_types::{
    Access, FieldDescriptor, MethodDescriptor, PrimitiveKind, ProviderError,
    version_token_from_package,
};
use parking_lot::RwLock;
use std::{
    collections::{HashMap, HashSet},
    fmt::{Debug, Formatter},
    hash::{Hash, Hasher},
    path::Path,
    sync::Arc,
};
use tracing::debug;

/// A type in a [`ModelProvider`]. Identity is the slot it was defined in.
#[derive(Clone)]
pub struct ModelType {
    index: u32,
    name: Arc<str>,
}

impl ModelType {
    pub fn name(&self) -> &str {
        &self.name
    }
}

impl Debug for ModelType {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name)
    }
}

impl PartialEq for ModelType {
    fn eq(&self, other: &Self) -> bool {
        self.index == other.index
    }
}

impl Eq for ModelType {}

impl Hash for ModelType {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.index.hash(state);
    }
}

/// Raw method handle: owner slot and declaration index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MethodRef {
    pub owner: u32,
    pub index: u32,
}

/// Raw field handle: owner slot and declaration index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FieldRef {
    pub owner: u32,
    pub index: u32,
}

struct MethodEntry {
    name: String,
    parameters: Vec<ModelType>,
    access: Access,
    locked: bool,
}

struct FieldEntry {
    name: String,
    access: Access,
    locked: bool,
}

struct TypeEntry {
    handle: ModelType,
    supertypes: Vec<u32>,
    primitive: Option<PrimitiveKind>,
    boxes: Option<PrimitiveKind>,
    methods: Vec<MethodEntry>,
    fields: Vec<FieldEntry>,
}

#[derive(Default)]
struct ModelIndex {
    types: Vec<TypeEntry>,
    by_name: HashMap<String, u32>,
    unlocked_methods: HashSet<MethodRef>,
    unlocked_fields: HashSet<FieldRef>,
}

impl ModelIndex {
    fn lookup(&self, name: &str) -> Option<&TypeEntry> {
        self.by_name.get(name).map(|i| &self.types[*i as usize])
    }

    /// Defines a batch of types. Names may refer to each other and to
    /// anything defined earlier. Nothing is added if any reference is unknown.
    fn define(&mut self, models: Vec<TypeModel>) -> Result<Vec<ModelType>, ModelError> {
        let base = self.types.len() as u32;
        let mut pending: HashMap<&str, u32> = HashMap::new();
        for (offset, model) in models.iter().enumerate() {
            if model.name.trim().is_empty() {
                return Err(ModelError::EmptyName("<type>".to_string()));
            }
            if self.by_name.contains_key(&model.name)
                || pending.insert(&model.name, base + offset as u32).is_some()
            {
                return Err(ModelError::DuplicateType(model.name.clone()));
            }
        }

        let resolve = |referenced_by: &str, name: &str| -> Result<ModelType, ModelError> {
            let index = self
                .by_name
                .get(name)
                .or_else(|| pending.get(name))
                .copied()
                .ok_or_else(|| ModelError::UnknownType {
                    referenced_by: referenced_by.to_string(),
                    name: name.to_string(),
                })?;
            Ok(ModelType {
                index,
                name: Arc::from(name),
            })
        };

        let mut entries = Vec::with_capacity(models.len());
        for (offset, model) in models.iter().enumerate() {
            let supertypes = model
                .supertypes
                .iter()
                .map(|s| resolve(&model.name, s).map(|t| t.index))
                .collect::<Result<Vec<_>, _>>()?;

            let mut methods = Vec::with_capacity(model.methods.len());
            for m in &model.methods {
                if m.name.trim().is_empty() {
                    return Err(ModelError::EmptyName(model.name.clone()));
                }
                methods.push(MethodEntry {
                    name: m.name.clone(),
                    parameters: m
                        .parameters
                        .iter()
                        .map(|p| resolve(&model.name, p))
                        .collect::<Result<_, _>>()?,
                    access: m.access,
                    locked: m.locked,
                });
            }

            let mut fields = Vec::with_capacity(model.fields.len());
            for f in &model.fields {
                if f.name.trim().is_empty() {
                    return Err(ModelError::EmptyName(model.name.clone()));
                }
                fields.push(FieldEntry {
                    name: f.name.clone(),
                    access: f.access,
                    locked: f.locked,
                });
            }

            entries.push(TypeEntry {
                handle: ModelType {
                    index: base + offset as u32,
                    name: Arc::from(model.name.as_str()),
                },
                supertypes,
                primitive: model.primitive,
                boxes: model.boxes,
                methods,
                fields,
            });
        }

        let handles = entries.iter().map(|e| e.handle.clone()).collect();
        for entry in entries {
            self.by_name
                .insert(entry.handle.name.to_string(), entry.handle.index);
            self.types.push(entry);
        }
        Ok(handles)
    }

    fn is_subtype(&self, target: u32, source: u32) -> bool {
        let mut stack = vec![source];
        let mut seen = HashSet::new();
        while let Some(current) = stack.pop() {
            if current == target {
                return true;
            }
            if seen.insert(current) {
                stack.extend(self.types[current as usize].supertypes.iter().copied());
            }
        }
        false
    }
}

/// An in-memory [`ReflectionProvider`] over a [`HostModel`].
///
/// Counts every call it receives, which makes it the reference fake for
/// asserting how often the resolvers reach the host.
pub struct ModelProvider {
    version: Option<String>,
    implementation_package: Option<String>,
    index: RwLock<ModelIndex>,
    calls: ProviderCalls,
}

impl ModelProvider {
    pub fn new(model: HostModel) -> Result<Self, ModelError> {
        let mut index = ModelIndex::default();
        let mut types = model.missing_builtins();
        types.extend(model.types);
        index.define(types)?;
        debug!(types = index.types.len(), "loaded host model");

        Ok(Self {
            version: model.version,
            implementation_package: model.implementation_package,
            index: RwLock::new(index),
            calls: ProviderCalls::default(),
        })
    }

    pub fn from_json(text: &str) -> Result<Self, ModelError> {
        Self::new(HostModel::from_json(text)?)
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ModelError> {
        Self::new(HostModel::from_path(path)?)
    }

    /// Adds a type after construction. Existing resolver caches are unaffected.
    pub fn define_type(&self, model: TypeModel) -> Result<ModelType, ModelError> {
        let mut defined = self.index.write().define(vec![model])?;
        Ok(defined.remove(0))
    }

    /// Looks a type up by qualified name without counting as a provider call.
    pub fn type_named(&self, name: &str) -> Option<ModelType> {
        self.index.read().lookup(name).map(|e| e.handle.clone())
    }

    /// Every qualified type name, in definition order.
    pub fn type_names(&self) -> Vec<String> {
        self.index
            .read()
            .types
            .iter()
            .map(|t| t.handle.name.to_string())
            .collect()
    }

    pub fn is_method_unlocked(&self, method: MethodRef) -> bool {
        self.index.read().unlocked_methods.contains(&method)
    }

    pub fn is_field_unlocked(&self, field: FieldRef) -> bool {
        self.index.read().unlocked_fields.contains(&field)
    }

    pub fn calls(&self) -> CallCounts {
        self.calls.snapshot()
    }
}

impl ReflectionProvider for ModelProvider {
    type Type = ModelType;
    type Method = MethodRef;
    type Field = FieldRef;

    fn current_host_version_token(&self) -> Result<String, ProviderError> {
        ProviderCalls::bump(&self.calls.version_lookups);
        if let Some(version) = &self.version {
            return Ok(version.clone());
        }
        self.implementation_package
            .as_deref()
            .and_then(version_token_from_package)
            .map(str::to_string)
            .ok_or_else(|| ProviderError::Other("model has no version token".to_string()))
    }

    fn find_type(&self, qualified_name: &str) -> Result<ModelType, ProviderError> {
        ProviderCalls::bump(&self.calls.find_type);
        self.type_named(qualified_name)
            .ok_or_else(|| ProviderError::NotFound(qualified_name.to_string()))
    }

    fn declared_methods(
        &self,
        owner: &ModelType,
    ) -> Result<Vec<MethodDescriptor<ModelType, MethodRef>>, ProviderError> {
        ProviderCalls::bump(&self.calls.declared_methods);
        let index = self.index.read();
        let entry = index
            .types
            .get(owner.index as usize)
            .ok_or_else(|| ProviderError::Linkage(format!("{:?} is not in this model", owner)))?;
        Ok(entry
            .methods
            .iter()
            .enumerate()
            .map(|(i, m)| MethodDescriptor {
                name: m.name.clone(),
                parameters: m.parameters.clone(),
                access: m.access,
                raw: MethodRef {
                    owner: owner.index,
                    index: i as u32,
                },
            })
            .collect())
    }

    fn declared_fields(
        &self,
        owner: &ModelType,
    ) -> Result<Vec<FieldDescriptor<FieldRef>>, ProviderError> {
        ProviderCalls::bump(&self.calls.declared_fields);
        let index = self.index.read();
        let entry = index
            .types
            .get(owner.index as usize)
            .ok_or_else(|| ProviderError::Linkage(format!("{:?} is not in this model", owner)))?;
        Ok(entry
            .fields
            .iter()
            .enumerate()
            .map(|(i, f)| FieldDescriptor {
                name: f.name.clone(),
                access: f.access,
                raw: FieldRef {
                    owner: owner.index,
                    index: i as u32,
                },
            })
            .collect())
    }

    fn unlock_access(
        &self,
        target: UnlockTarget<'_, MethodRef, FieldRef>,
    ) -> Result<(), ProviderError> {
        ProviderCalls::bump(&self.calls.unlock_access);
        let mut index = self.index.write();
        match target {
            UnlockTarget::Method(m) => {
                let entry = index
                    .types
                    .get(m.owner as usize)
                    .and_then(|t| t.methods.get(m.index as usize))
                    .ok_or_else(|| ProviderError::Linkage(format!("unknown method {:?}", m)))?;
                if entry.locked {
                    return Err(ProviderError::AccessDenied(entry.name.clone()));
                }
                index.unlocked_methods.insert(*m);
            }
            UnlockTarget::Field(f) => {
                let entry = index
                    .types
                    .get(f.owner as usize)
                    .and_then(|t| t.fields.get(f.index as usize))
                    .ok_or_else(|| ProviderError::Linkage(format!("unknown field {:?}", f)))?;
                if entry.locked {
                    return Err(ProviderError::AccessDenied(entry.name.clone()));
                }
                index.unlocked_fields.insert(*f);
            }
        }
        Ok(())
    }

    fn is_assignable_from(&self, target: &ModelType, source: &ModelType) -> bool {
        if target == source {
            return true;
        }
        let index = self.index.read();
        let Some(source_entry) = index.types.get(source.index as usize) else {
            return false;
        };
        if source_entry.primitive.is_some() {
            return false;
        }
        if &*target.name == OBJECT {
            return true;
        }
        index.is_subtype(target.index, source.index)
    }

    fn boxed_type(&self, kind: PrimitiveKind) -> Option<ModelType> {
        self.index
            .read()
            .types
            .iter()
            .find(|t| t.boxes == Some(kind))
            .map(|t| t.handle.clone())
    }

    fn primitive_type(&self, kind: PrimitiveKind) -> Option<ModelType> {
        self.index
            .read()
            .types
            .iter()
            .find(|t| t.primitive == Some(kind))
            .map(|t| t.handle.clone())
    }
}
