//! Registry built from derived models.


use models::*;
use relq::{
    Model, ModelRegistry, ModelType, NamingStrategy, RegistryError, RelationKind,
};

#[test]
fn inventory_collects_every_derived_model() {
    let registry = registry();

    for model in [
        ModelType::of::<Product>(),
        ModelType::of::<Sale>(),
        ModelType::of::<Seller>(),
        ModelType::of::<Company>(),
        ModelType::of::<Country>(),
        ModelType::of::<City>(),
        ModelType::of::<Person>(),
        ModelType::of::<Bicycle>(),
        ModelType::of::<Employee>(),
        ModelType::of::<Child>(),
        ModelType::of::<Parent1>(),
        ModelType::of::<Parent2>(),
        ModelType::of::<ParentParent>(),
        ModelType::of::<Shipment>(),
    ] {
        assert!(registry.contains(model), "{model:?} is not registered");
    }
}

#[test]
fn derived_descriptor() {
    let descriptor = Bicycle::descriptor();

    assert_eq!(descriptor.name, "Bicycle");
    assert_eq!(descriptor.table, None);
    assert_eq!(descriptor.fields.len(), 2);
    assert_eq!(descriptor.field("owner_name").and_then(|f| f.column), Some("owner"));

    let owner = descriptor.relation("owner").unwrap();
    assert_eq!(owner.kind, Some(RelationKind::BelongsTo));
    assert_eq!(owner.foreign_key, Some("owner_name"));
    assert_eq!(owner.references, Some("name"));
    assert_eq!((owner.target)(), ModelType::of::<Person>());

    assert!(Product::descriptor().is_soft_delete());
    assert!(!City::descriptor().is_soft_delete());
}

#[test]
fn derived_prefix_and_uuid_fields() {
    let descriptor = Shipment::descriptor();

    let tracking = descriptor.field("tracking").unwrap();
    assert!(tracking.uuid);
    assert_eq!(tracking.prefix, None);
    assert!(!descriptor.field("reference").unwrap().uuid);

    let postcode = descriptor.field("postcode").unwrap();
    assert_eq!(postcode.prefix, Some("dest_"));
    assert_eq!(postcode.column, Some("zip"));
}

#[test]
fn explicit_table_name() {
    let registry = registry();
    assert_eq!(registry.table_name(ModelType::of::<Person>()).unwrap(), "people");
    assert_eq!(
        registry.table_name(ModelType::of::<ParentParent>()).unwrap(),
        "parent_parents"
    );
}

#[test]
fn relation_direction_is_inferred() {
    let registry = registry();

    let product = registry.relation(ModelType::of::<Sale>(), "product").unwrap();
    assert_eq!(product.kind, RelationKind::BelongsTo);
    assert_eq!(product.local_column, "product_id");
    assert_eq!(product.remote_column, "id");

    let capital = registry.relation(ModelType::of::<Country>(), "capital").unwrap();
    assert_eq!(capital.kind, RelationKind::HasOne);
    assert_eq!(capital.local_column, "id");
    assert_eq!(capital.remote_column, "country_id");
}

#[derive(Debug)]
struct LegacyNaming;

impl NamingStrategy for LegacyNaming {
    fn table_name(&self, model_name: &str) -> String {
        format!("tbl_{}", model_name.to_lowercase())
    }

    fn column_name(&self, _table: &str, field: &str) -> String {
        field.to_uppercase()
    }
}

#[test]
fn custom_naming_strategy() {
    let registry = ModelRegistry::builder()
        .naming(LegacyNaming)
        .register::<Sale>()
        .register::<Product>()
        .register::<Seller>()
        .register::<Company>()
        .build()
        .unwrap();

    let query = registry
        .compile([Sale::PRODUCT.join([Product::INT.is(relq::prelude::eq(1))])])
        .unwrap();
    assert_eq!(
        query.sql(),
        "SELECT tbl_sale.* FROM tbl_sale \
         INNER JOIN tbl_product tbl_sale__product ON tbl_sale__product.ID = tbl_sale.PRODUCT_ID \
         AND tbl_sale__product.DELETED_AT IS NULL AND tbl_sale__product.INT = ?"
    );
}

#[test]
fn relation_target_must_be_registered() {
    let err = ModelRegistry::builder()
        .register::<Sale>()
        .register::<Product>()
        .build()
        .unwrap_err();

    assert!(matches!(
        err,
        RegistryError::UnknownTarget {
            model: "Sale",
            relation: "seller",
            target: "Seller"
        }
    ));
}
