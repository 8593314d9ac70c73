//! Compilation properties over derived models.


use models::*;
use relq::prelude::*;
use relq::ErrorKind;

#[test]
fn aliases_follow_the_relation_path() {
    let registry = registry();
    let query = registry
        .compile([Sale::SELLER.join([Seller::COMPANY.join([Company::NAME.is(eq("acme"))])])])
        .unwrap();

    let sql = query.sql();
    assert!(sql.contains("INNER JOIN sellers sales__seller ON sales__seller.id = sales.seller_id"));
    assert!(sql.contains(
        "INNER JOIN companies sales__seller__company ON sales__seller__company.id = sales__seller.company_id"
    ));
    assert!(sql.ends_with("AND sales__seller__company.name = ?"));
}

#[test]
fn same_model_through_two_paths_gets_two_aliases() {
    let registry = registry();
    let query = registry
        .compile([
            Child::PARENT1.join([Parent1::PARENT_PARENT.join([ParentParent::NAME.is(eq("a"))])]),
            Child::PARENT2.join([Parent2::PARENT_PARENT.join([ParentParent::NAME.is(eq("b"))])]),
        ])
        .unwrap();

    let sql = query.sql();
    assert!(sql.contains("parent_parents children__parent1__parent_parent "));
    assert!(sql.contains("parent_parents children__parent2__parent_parent "));
    assert_eq!(query.join_count(), 4);
    assert_eq!(format!("{:?}", query.params()), r#"["a", "b"]"#);
}

#[test]
fn explicit_join_selection() {
    let registry = registry();
    let joins = || {
        vec![
            Child::PARENT1.join([Parent1::PARENT_PARENT.join(Vec::<Condition<ParentParent>>::new())]),
            Child::PARENT2.join([Parent2::PARENT_PARENT.join(Vec::<Condition<ParentParent>>::new())]),
        ]
    };

    let mut conditions = joins();
    conditions.push(Child::NAME.is(eq(ParentParent::NAME)).into());
    let err = registry.compile(conditions).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::JoinMustBeSelected);

    let mut conditions = joins();
    conditions.push(Child::NAME.is(eq(ParentParent::NAME).select_join(0, 0)).into());
    let query = registry.compile(conditions).unwrap();
    assert!(query.sql().ends_with("WHERE children.name = children__parent1__parent_parent.name"));

    let mut conditions = joins();
    conditions.push(Child::NAME.is(eq(ParentParent::NAME).select_join(0, 2)).into());
    let err = registry.compile(conditions).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::JoinNotFound);
}

#[test]
fn operand_resolution_does_not_depend_on_condition_order() {
    let registry = registry();
    let before = registry
        .compile([
            Condition::from(Sale::CODE.is(eq(Product::INT))),
            Sale::PRODUCT.join(Vec::<Condition<Product>>::new()),
        ])
        .unwrap();
    let after = registry
        .compile([
            Sale::PRODUCT.join(Vec::<Condition<Product>>::new()),
            Condition::from(Sale::CODE.is(eq(Product::INT))),
        ])
        .unwrap();

    assert_eq!(before.sql(), after.sql());
    assert!(before.sql().ends_with("WHERE sales.code = sales__product.int"));
}

#[test]
fn field_of_model_outside_the_query() {
    let registry = registry();
    let err = registry
        .compile([Sale::CODE.is(eq(Product::INT))])
        .unwrap_err();

    assert!(err.is_field_not_concerned());
    assert_eq!(
        err.root(),
        &CompileError::FieldNotConcerned {
            model: "Product",
            operator: "Eq"
        }
    );
}

#[test]
fn in_list_renders_one_placeholder_per_value() {
    let registry = registry();
    let query = registry
        .compile([Seller::NAME.is(array_in(["a", "b"]))])
        .unwrap();

    assert_eq!(
        query.sql(),
        "SELECT sellers.* FROM sellers WHERE sellers.name IN (?, ?)"
    );
    assert_eq!(query.params().len(), 2);
}

#[test]
fn null_handling() {
    let registry = registry();

    let err = registry
        .compile([Seller::COMPANY_ID.is(eq(None::<i64>))])
        .unwrap_err();
    assert!(err.is_value_cant_be_null());

    let query = registry
        .compile([Seller::COMPANY_ID.is(eq_or_is_null(None::<i64>))])
        .unwrap();
    assert_eq!(
        query.sql(),
        "SELECT sellers.* FROM sellers WHERE sellers.company_id IS NULL"
    );

    let query = registry
        .compile([Seller::COMPANY_ID.is(eq(4))])
        .unwrap();
    assert_eq!(format!("{:?}", query.params()), "[Some(4)]");
}

#[test]
fn relation_referencing_a_non_id_field() {
    let registry = registry();
    let query = registry
        .compile([Bicycle::OWNER.join([Person::NAME.is(eq("Ada"))])])
        .unwrap();

    assert_eq!(
        query.sql(),
        "SELECT bicycles.* FROM bicycles \
         INNER JOIN people bicycles__owner ON bicycles__owner.name = bicycles.owner \
         AND bicycles__owner.name = ?"
    );
}

#[test]
fn column_override_applies_to_filters() {
    let registry = registry();
    let query = registry
        .compile([Bicycle::OWNER_NAME.is(like("A%"))])
        .unwrap();

    assert_eq!(
        query.sql(),
        "SELECT bicycles.* FROM bicycles WHERE bicycles.owner LIKE ?"
    );
}

#[test]
fn preload_selects_every_column_of_the_target() {
    let registry = registry();
    let query = registry.compile([Sale::SELLER.preload()]).unwrap();

    assert_eq!(
        query.sql(),
        "SELECT sales.*, \
         sales__seller.id AS \"sales__seller__id\", \
         sales__seller.name AS \"sales__seller__name\", \
         sales__seller.company_id AS \"sales__seller__company_id\", \
         sales__seller.deleted_at AS \"sales__seller__deleted_at\" \
         FROM sales \
         LEFT JOIN sellers sales__seller ON sales__seller.id = sales.seller_id \
         AND sales__seller.deleted_at IS NULL"
    );
}

#[test]
fn nested_preload() {
    let registry = registry();
    let query = registry
        .compile([Sale::SELLER.join([Condition::preload(), Seller::COMPANY.preload()])])
        .unwrap();

    let sql = query.sql();
    assert!(sql.contains("sales__seller__company.name AS \"sales__seller__company__name\""));
    assert!(sql.contains("LEFT JOIN sellers sales__seller "));
    assert!(sql.contains("LEFT JOIN companies sales__seller__company "));
}

#[test]
fn compiling_is_deterministic() {
    let registry = registry();
    let conditions = vec![
        Condition::from(or([Sale::CODE.is(eq(1)), Sale::CODE.is(gt(10))])),
        Sale::PRODUCT.join([
            Condition::from(Product::INT.is(array_in([1, 2, 3]))),
            Condition::preload(),
        ]),
        Sale::SELLER.join([Seller::COMPANY.join([Company::NAME.is(eq("acme"))])]),
    ];

    let first = registry.compile(conditions.clone()).unwrap();
    for _ in 0..10 {
        let again = registry.compile(conditions.clone()).unwrap();
        assert_eq!(again.sql(), first.sql());
        assert_eq!(format!("{:?}", again.params()), format!("{:?}", first.params()));
    }
}

#[test]
fn registry_is_shared_between_threads() {
    let registry = registry();

    std::thread::scope(|scope| {
        let handles: Vec<_> = (0..4)
            .map(|i| {
                let registry = &registry;
                scope.spawn(move || {
                    registry
                        .compile([Sale::PRODUCT.join([Product::INT.is(eq(i))])])
                        .map(|query| query.sql())
                })
            })
            .collect();

        let sqls: Vec<String> = handles
            .into_iter()
            .map(|handle| handle.join().unwrap().unwrap())
            .collect();
        assert!(sqls.windows(2).all(|pair| pair[0] == pair[1]));
    });
}

#[test]
fn soft_deleted_root_is_opt_in() {
    let registry = registry();
    let compiler = Compiler::new(&registry)
        .with_config(CompilerConfig::new().scope_root_soft_delete(true));

    let query = compiler
        .compile([Company::NAME.is(eq("acme"))])
        .unwrap();
    assert_eq!(
        query.sql(),
        "SELECT companies.* FROM companies WHERE companies.name = ? AND companies.deleted_at IS NULL"
    );
}
