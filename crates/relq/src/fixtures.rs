//! Hand-written models shared by unit tests.

use crate::field::{Field, Relation};
use crate::model::{FieldDescriptor, Model, ModelDescriptor, ModelType, RelationDescriptor};

macro_rules! fields {
    ($($name:literal),* $(,)?) => {
        &[$(FieldDescriptor::new($name)),*]
    };
}

macro_rules! relation {
    ($name:literal => $target:ty) => {
        RelationDescriptor {
            name: $name,
            target: ModelType::of::<$target>,
            kind: None,
            foreign_key: None,
            references: None,
        }
    };
}

macro_rules! model {
    ($ty:ident, $fields:expr, [$($relation:expr),* $(,)?]) => {
        impl Model for $ty {
            fn descriptor() -> &'static ModelDescriptor {
                static DESCRIPTOR: ModelDescriptor = ModelDescriptor {
                    name: stringify!($ty),
                    table: None,
                    fields: $fields,
                    relations: &[$($relation),*],
                };
                &DESCRIPTOR
            }
        }
    };
}

pub struct Product;
pub struct Company;
pub struct Seller;
pub struct Sale;
pub struct Country;
pub struct City;
pub struct Employee;
pub struct Child;
pub struct Parent1;
pub struct Parent2;
pub struct ParentParent;

model!(
    Product,
    fields!["id", "string", "int", "int_pointer", "float", "bool", "deleted_at"],
    []
);
model!(Company, fields!["id", "name", "deleted_at"], []);
model!(
    Seller,
    fields!["id", "name", "company_id", "deleted_at"],
    [relation!("company" => Company)]
);
model!(
    Sale,
    &[
        FieldDescriptor::new("id"),
        FieldDescriptor::new("code"),
        FieldDescriptor::new("description"),
        FieldDescriptor::new("external_id").holds_uuid(),
        FieldDescriptor::new("product_id"),
        FieldDescriptor::new("seller_id"),
        FieldDescriptor::new("deleted_at"),
    ],
    [relation!("product" => Product), relation!("seller" => Seller)]
);
model!(Country, fields!["id", "name"], [relation!("capital" => City)]);
model!(
    City,
    &[
        FieldDescriptor::new("id"),
        FieldDescriptor::new("name"),
        FieldDescriptor::new("country_id"),
        FieldDescriptor::new("population").prefixed("census_"),
    ],
    []
);
model!(
    Employee,
    fields!["id", "name", "boss_id"],
    [relation!("boss" => Employee)]
);
model!(
    Child,
    fields!["id", "name", "parent1_id", "parent2_id"],
    [relation!("parent1" => Parent1), relation!("parent2" => Parent2)]
);
model!(
    Parent1,
    fields!["id", "parent_parent_id"],
    [relation!("parent_parent" => ParentParent)]
);
model!(
    Parent2,
    fields!["id", "parent_parent_id"],
    [relation!("parent_parent" => ParentParent)]
);
model!(ParentParent, fields!["id", "name"], []);

impl Product {
    pub const STRING: Field<Product, String> = Field::new("string");
    pub const INT: Field<Product, i32> = Field::new("int");
    pub const INT_POINTER: Field<Product, Option<i32>> = Field::new("int_pointer");
    pub const BOOL: Field<Product, bool> = Field::new("bool");
    pub const DELETED_AT: Field<Product, Option<chrono::DateTime<chrono::Utc>>> =
        Field::new("deleted_at");
}

impl Company {
    pub const NAME: Field<Company, String> = Field::new("name");
}

impl Seller {
    pub const NAME: Field<Seller, String> = Field::new("name");
    pub const COMPANY: Relation<Seller, Company> = Relation::new("company");
}

impl Sale {
    pub const CODE: Field<Sale, i32> = Field::new("code");
    pub const DESCRIPTION: Field<Sale, String> = Field::new("description");
    pub const EXTERNAL_ID: Field<Sale, Option<uuid::Uuid>> = Field::new("external_id");
    pub const PRODUCT: Relation<Sale, Product> = Relation::new("product");
    pub const SELLER: Relation<Sale, Seller> = Relation::new("seller");
}

impl Country {
    pub const ID: Field<Country, i64> = Field::new("id");
    pub const CAPITAL: Relation<Country, City> = Relation::new("capital");
}

impl City {
    pub const NAME: Field<City, String> = Field::new("name");
    pub const POPULATION: Field<City, i64> = Field::new("population").prefixed("census_");
}

impl Employee {
    pub const NAME: Field<Employee, String> = Field::new("name");
    pub const BOSS: Relation<Employee, Employee> = Relation::new("boss");
}

impl Child {
    pub const NAME: Field<Child, String> = Field::new("name");
    pub const PARENT1: Relation<Child, Parent1> = Relation::new("parent1");
    pub const PARENT2: Relation<Child, Parent2> = Relation::new("parent2");
}

impl Parent1 {
    pub const PARENT_PARENT: Relation<Parent1, ParentParent> = Relation::new("parent_parent");
}

impl Parent2 {
    pub const PARENT_PARENT: Relation<Parent2, ParentParent> = Relation::new("parent_parent");
}

impl ParentParent {
    pub const NAME: Field<ParentParent, String> = Field::new("name");
}

/// A registry holding every fixture model.
pub fn registry() -> crate::ModelRegistry {
    crate::ModelRegistry::builder()
        .register::<Product>()
        .register::<Company>()
        .register::<Seller>()
        .register::<Sale>()
        .register::<Country>()
        .register::<City>()
        .register::<Employee>()
        .register::<Child>()
        .register::<Parent1>()
        .register::<Parent2>()
        .register::<ParentParent>()
        .build()
        .expect("fixture registry")
}
