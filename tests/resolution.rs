use mirror_rs::{
    model::{HostModel, ModelProvider, ModelType, TypeModel},
    types::Access,
    ClassCategory::{CraftBukkit, MinecraftServer},
    MirrorConfig, MirrorResolver, Signature, SignatureMatching,
};
use std::sync::Arc;

const FIXTURE: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/tests/fixtures/host.json");

fn load() -> Arc<ModelProvider> {
    Arc::new(ModelProvider::from_path(FIXTURE).unwrap())
}

fn resolver(provider: &Arc<ModelProvider>) -> MirrorResolver<Arc<ModelProvider>> {
    MirrorResolver::with_defaults(Arc::clone(provider))
}

fn ty(provider: &ModelProvider, name: &str) -> ModelType {
    provider.type_named(name).unwrap()
}

fn entity(resolver: &MirrorResolver<Arc<ModelProvider>>) -> ModelType {
    resolver.resolve_type(MinecraftServer, "Entity").unwrap().unwrap()
}

#[test]
fn test_type_resolution_is_memoized() {
    let provider = load();
    let resolver = resolver(&provider);

    let first = entity(&resolver);
    assert_eq!(first.name(), "net.minecraft.server.v1_12_R1.Entity");
    let before = provider.calls();
    let second = entity(&resolver);
    assert_eq!(first, second);
    assert_eq!(provider.calls(), before);
    assert_eq!(before.version_lookups, 1);
    assert_eq!(before.find_type, 1);

    let server = resolver.resolve_type(CraftBukkit, "CraftServer").unwrap().unwrap();
    assert_eq!(server.name(), "org.bukkit.craftbukkit.v1_12_R1.CraftServer");
    assert_eq!(provider.calls().version_lookups, 1);
}

#[test]
fn test_absent_type_costs_one_lookup() {
    let provider = load();
    let resolver = resolver(&provider);

    assert!(resolver.resolve_type(MinecraftServer, "Foo").unwrap().is_none());
    let before = provider.calls();
    assert!(resolver.resolve_type(MinecraftServer, "Foo").unwrap().is_none());
    assert_eq!(provider.calls(), before);
    assert_eq!(before.scans(), 1);

    // Same short name, other category: a separate entry.
    assert!(resolver.resolve_type(CraftBukkit, "Foo").unwrap().is_none());
    assert_eq!(provider.calls().find_type, 2);
}

#[test]
fn test_qualified_name_uses_version_from_package() {
    let provider = load();
    let resolver = resolver(&provider);
    assert_eq!(
        resolver.qualified_name(MinecraftServer, "World").unwrap().as_deref(),
        Some("net.minecraft.server.v1_12_R1.World")
    );
    assert_eq!(resolver.version_token().as_deref(), Some("v1_12_R1"));
    assert_eq!(provider.calls().find_type, 0);
}

#[test]
fn test_failed_version_lookup_is_memoized() {
    let model = HostModel {
        version: None,
        ..HostModel::new("unused")
    }
    .with_type(TypeModel::new("net.minecraft.server.v1_12_R1.Entity"));
    let provider = Arc::new(ModelProvider::new(model).unwrap());
    let resolver = resolver(&provider);

    assert!(resolver.resolve_type(MinecraftServer, "Entity").unwrap().is_none());
    assert!(resolver.resolve_type(CraftBukkit, "CraftServer").unwrap().is_none());
    assert_eq!(provider.calls().version_lookups, 1);
    assert_eq!(provider.calls().find_type, 0);
    assert_eq!(resolver.stats().provider_errors, 1);
}

#[test]
fn test_method_handle_is_shared() {
    let provider = load();
    let resolver = resolver(&provider);
    let owner = entity(&resolver);

    let first = resolver.resolve_method(&owner, "tick", Signature::empty()).unwrap().unwrap();
    let before = provider.calls();
    let second = resolver.resolve_method(&owner, "tick", Signature::empty()).unwrap().unwrap();
    assert!(Arc::ptr_eq(&first, &second));
    assert_eq!(provider.calls(), before);
    // One type lookup and one method scan in total.
    assert_eq!(before.scans(), 2);
    assert_eq!(first.owner, owner);
    assert_eq!(&*first.name, "tick");
}

#[test]
fn test_missing_method_memoized() {
    let provider = load();
    let resolver = resolver(&provider);
    let owner = entity(&resolver);

    assert!(resolver.resolve_method(&owner, "jump", Signature::empty()).unwrap().is_none());
    let before = provider.calls();
    assert!(resolver.resolve_method(&owner, "jump", Signature::empty()).unwrap().is_none());
    assert_eq!(provider.calls(), before);
}

#[test]
fn test_missing_method_rescanned_when_not_cached() {
    let provider = load();
    let config = MirrorConfig::default().with_missing_methods_cached(false);
    let resolver = MirrorResolver::new(Arc::clone(&provider), config);
    let owner = entity(&resolver);

    for _ in 0..3 {
        assert!(resolver.resolve_method(&owner, "jump", Signature::empty()).unwrap().is_none());
    }
    assert_eq!(provider.calls().declared_methods, 3);
}

#[test]
fn test_widening_match() {
    let provider = load();
    let resolver = resolver(&provider);
    let owner = entity(&resolver);
    let player = ty(&provider, "net.minecraft.server.v1_12_R1.EntityPlayer");
    let world = ty(&provider, "net.minecraft.server.v1_12_R1.World");

    let attach = resolver.resolve_method(&owner, "attach", [player]).unwrap().unwrap();
    assert_eq!(attach.parameters, Signature::from([owner.clone()]));
    assert!(resolver.resolve_method(&owner, "attach", [world]).unwrap().is_none());
}

#[test]
fn test_exact_matching_rejects_subtypes() {
    let provider = load();
    let config = MirrorConfig::default().with_matching(SignatureMatching::Exact);
    let resolver = MirrorResolver::new(Arc::clone(&provider), config);
    let owner = entity(&resolver);
    let player = ty(&provider, "net.minecraft.server.v1_12_R1.EntityPlayer");

    assert!(resolver.resolve_method(&owner, "attach", [player]).unwrap().is_none());
    assert!(resolver.resolve_method(&owner, "attach", [owner.clone()]).unwrap().is_some());
}

#[test]
fn test_boxed_and_primitive_arguments() {
    let provider = load();
    let resolver = resolver(&provider);
    let owner = entity(&resolver);

    let integer = ty(&provider, "java.lang.Integer");
    let set_count = resolver.resolve_method(&owner, "setCount", [integer]).unwrap().unwrap();
    assert_eq!(set_count.parameters[0].name(), "int");

    let boolean = ty(&provider, "boolean");
    let set_flag = resolver.resolve_method(&owner, "setFlag", [boolean]).unwrap().unwrap();
    assert_eq!(set_flag.parameters[0].name(), "java.lang.Boolean");

    let long = ty(&provider, "long");
    assert!(resolver.resolve_method(&owner, "setCount", [long]).unwrap().is_none());
}

#[test]
fn test_argument_order_matters() {
    let provider = load();
    let resolver = resolver(&provider);
    let owner = entity(&resolver);
    let int = ty(&provider, "int");
    let string = ty(&provider, "java.lang.String");

    let forward = Signature::from([int.clone(), string.clone()]);
    let backward = Signature::from([string, int]);
    assert_ne!(forward, backward);
    resolver.resolve_method(&owner, "setCount", forward).unwrap();
    resolver.resolve_method(&owner, "setCount", backward).unwrap();
    assert_eq!(resolver.caches.sizes().method_size, 2);
}

#[test]
fn test_methods_are_not_inherited() {
    let provider = load();
    let resolver = resolver(&provider);
    let player = resolver.resolve_type(MinecraftServer, "EntityPlayer").unwrap().unwrap();
    let float = ty(&provider, "float");
    assert!(resolver.resolve_method(&player, "heal", [float]).unwrap().is_none());
}

#[test]
fn test_locked_method_is_absent() {
    let provider = load();
    let resolver = resolver(&provider);
    let owner = entity(&resolver);

    assert!(resolver.resolve_method(&owner, "secret", Signature::empty()).unwrap().is_none());
    assert!(resolver.resolve_method(&owner, "secret", Signature::empty()).unwrap().is_none());
    assert_eq!(provider.calls().unlock_access, 1);
}

#[test]
fn test_restricted_method_is_unlocked_once() {
    let provider = load();
    let resolver = resolver(&provider);
    let owner = entity(&resolver);
    let int = ty(&provider, "int");

    let reset = resolver.resolve_method(&owner, "resetCooldown", [int.clone()]).unwrap().unwrap();
    assert_eq!(reset.access, Access::Unlocked);
    assert!(provider.is_method_unlocked(reset.raw));

    let tick = resolver.resolve_method(&owner, "tick", Signature::empty()).unwrap().unwrap();
    assert_eq!(tick.access, Access::Public);
    assert!(!provider.is_method_unlocked(tick.raw));

    resolver.resolve_method(&owner, "resetCooldown", [int]).unwrap();
    assert_eq!(provider.calls().unlock_access, 1);
}

#[test]
fn test_field_resolution() {
    let provider = load();
    let resolver = resolver(&provider);
    let owner = entity(&resolver);

    let count = resolver.resolve_field(&owner, "count").unwrap().unwrap();
    assert_eq!(count.access, Access::Unlocked);
    assert!(provider.is_field_unlocked(count.raw));

    let name = resolver.resolve_field(&owner, "name").unwrap().unwrap();
    assert_eq!(name.access, Access::Public);
    assert!(!provider.is_field_unlocked(name.raw));

    assert!(resolver.resolve_field(&owner, "missing").unwrap().is_none());
    let before = provider.calls();
    assert!(resolver.resolve_field(&owner, "missing").unwrap().is_none());
    assert_eq!(provider.calls(), before);
    assert_eq!(before.declared_fields, 3);
}

#[test]
fn test_caches_are_append_only() {
    let provider = load();
    let resolver = resolver(&provider);

    assert!(resolver.resolve_type(MinecraftServer, "Late").unwrap().is_none());
    provider
        .define_type(TypeModel::new("net.minecraft.server.v1_12_R1.Late"))
        .unwrap();
    assert!(resolver.resolve_type(MinecraftServer, "Late").unwrap().is_none());

    let fresh = self::resolver(&provider);
    assert!(fresh.resolve_type(MinecraftServer, "Late").unwrap().is_some());
}

#[test]
fn test_stats_track_every_cache() {
    let provider = load();
    let resolver = resolver(&provider);
    let owner = entity(&resolver);
    entity(&resolver);
    resolver.resolve_method(&owner, "tick", Signature::empty()).unwrap();
    resolver.resolve_field(&owner, "count").unwrap();
    resolver.resolve_field(&owner, "count").unwrap();
    resolver.resolve_field(&owner, "missing").unwrap();

    let stats = resolver.stats();
    assert_eq!((stats.types.hits, stats.types.misses, stats.types.size), (1, 1, 1));
    assert_eq!((stats.methods.hits, stats.methods.misses, stats.methods.size), (0, 1, 1));
    assert_eq!((stats.fields.hits, stats.fields.misses, stats.fields.size), (1, 2, 2));
    assert_eq!(stats.provider_errors, 0);

    let json = serde_json::to_value(stats).unwrap();
    assert_eq!(json["fields"]["misses"], 2);
}
