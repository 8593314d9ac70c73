use super::*;
use crate::Compiler;
use crate::compiler::CompilerConfig;
use crate::dialect::Dialect;
use crate::fixtures::{self, Product, Sale, Seller};
use crate::{Condition, ErrorKind};

fn where_sql(operator: Operator<i32>) -> String {
    let registry = fixtures::registry();
    registry
        .compile([Product::INT.is(operator)])
        .unwrap()
        .sql()
        .trim_start_matches("SELECT products.* FROM products WHERE ")
        .to_string()
}

fn compile_error(operator: Operator<i32>) -> CompileError {
    let registry = fixtures::registry();
    registry.compile([Product::INT.is(operator)]).unwrap_err()
}

#[test]
fn comparison_operators() {
    assert_eq!(where_sql(eq(1)), "products.int = ?");
    assert_eq!(where_sql(not_eq(1)), "products.int <> ?");
    assert_eq!(where_sql(lt(1)), "products.int < ?");
    assert_eq!(where_sql(lt_or_eq(1)), "products.int <= ?");
    assert_eq!(where_sql(gt(1)), "products.int > ?");
    assert_eq!(where_sql(gt_or_eq(1)), "products.int >= ?");
    assert_eq!(where_sql(is_distinct(1)), "products.int IS DISTINCT FROM ?");
    assert_eq!(where_sql(is_not_distinct(1)), "products.int IS NOT DISTINCT FROM ?");
}

#[test]
fn predicates_have_no_operand() {
    assert_eq!(where_sql(is_null()), "products.int IS NULL");
    assert_eq!(where_sql(is_not_null()), "products.int IS NOT NULL");

    let registry = fixtures::registry();
    let query = registry.compile([Product::BOOL.is(is_not_true())]).unwrap();
    assert_eq!(
        query.sql(),
        "SELECT products.* FROM products WHERE products.bool IS NOT TRUE"
    );
    assert!(query.params().is_empty());
}

#[test]
fn between_binds_both_bounds() {
    let registry = fixtures::registry();
    let query = registry
        .compile([Product::INT.is(not_between(1, 5))])
        .unwrap();
    assert_eq!(
        query.sql(),
        "SELECT products.* FROM products WHERE products.int NOT BETWEEN ? AND ?"
    );
    assert_eq!(format!("{:?}", query.params()), "[1, 5]");
}

#[test]
fn array_in_renders_one_list() {
    let registry = fixtures::registry();
    let query = registry
        .compile([Product::INT.is(array_in([3, 1, 2]))])
        .unwrap();
    assert_eq!(
        query.sql(),
        "SELECT products.* FROM products WHERE products.int IN (?, ?, ?)"
    );
    assert_eq!(format!("{:?}", query.params()), "[3, 1, 2]");
    assert_eq!(
        query.sql_for(Dialect::Postgres),
        "SELECT products.* FROM products WHERE products.int IN ($1, $2, $3)"
    );
}

#[test]
fn empty_lists_are_constant() {
    assert_eq!(where_sql(array_in(Vec::<i32>::new())), "1=0");
    assert_eq!(where_sql(array_not_in(Vec::<i32>::new())), "1=1");
}

#[test]
fn null_literal_is_rejected_by_plain_comparisons() {
    let registry = fixtures::registry();
    let err = registry
        .compile([Product::INT_POINTER.is(eq(None::<i32>))])
        .unwrap_err();

    assert!(err.is_value_cant_be_null());
    assert_eq!(
        err.to_string(),
        "value to be compared can't be null; operator: Eq; model: Product, field: int_pointer"
    );
}

#[test]
fn null_aware_variants_fall_back_to_predicates() {
    let registry = fixtures::registry();

    let query = registry
        .compile([Product::INT_POINTER.is(eq_or_is_null(None::<i32>))])
        .unwrap();
    assert_eq!(
        query.sql(),
        "SELECT products.* FROM products WHERE products.int_pointer IS NULL"
    );

    let query = registry
        .compile([Product::INT_POINTER.is(not_eq_or_is_not_null(None::<i32>))])
        .unwrap();
    assert_eq!(
        query.sql(),
        "SELECT products.* FROM products WHERE products.int_pointer IS NOT NULL"
    );

    let query = registry
        .compile([Product::INT_POINTER.is(eq_or_is_null(3))])
        .unwrap();
    assert_eq!(
        query.sql(),
        "SELECT products.* FROM products WHERE products.int_pointer = ?"
    );
}

#[test]
fn like_with_escape() {
    let registry = fixtures::registry();
    let query = registry
        .compile([Product::STRING.is(like("a\\_%").escape('\\'))])
        .unwrap();

    assert_eq!(
        query.sql(),
        "SELECT products.* FROM products WHERE products.string LIKE ? ESCAPE ?"
    );
    assert_eq!(format!("{:?}", query.params()), r#"["a\\_%", "\\"]"#);
}

#[test]
fn escape_requires_a_pattern_operator() {
    let err = compile_error(eq(1).escape('!'));
    assert_eq!(err.kind(), ErrorKind::InvalidPattern);
}

#[test]
fn field_operand_renders_column() {
    let registry = fixtures::registry();
    let query = registry
        .compile([
            Condition::from(Sale::CODE.is(eq(Product::INT))),
            Sale::PRODUCT.join(Vec::<Condition<Product>>::new()),
        ])
        .unwrap();

    assert!(query.sql().ends_with("WHERE sales.code = sales__product.int"));
    assert!(query.params().is_empty());
}

#[test]
fn select_join_out_of_range() {
    let err = compile_error(eq(Product::INT).select_join(3, 0));
    assert_eq!(
        err.root(),
        &CompileError::OperandOutOfRange {
            operator: "Eq",
            index: 3,
            len: 1
        }
    );
}

#[test]
fn select_join_on_literal_has_no_effect() {
    assert_eq!(where_sql(between(1, 2).select_join(1, 0)), "products.int BETWEEN ? AND ?");
}

#[test]
fn dialect_operators() {
    let registry = fixtures::registry();
    let mysql = Compiler::new(&registry).with_config(CompilerConfig::new().dialect(Dialect::MySql));
    let query = mysql
        .compile([Product::INT_POINTER.is(crate::mysql::is_equal(None::<i32>))])
        .unwrap();
    assert_eq!(
        query.sql(),
        "SELECT products.* FROM products WHERE products.int_pointer <=> ?"
    );

    let err = registry
        .compile([Product::INT_POINTER.is(crate::mysql::is_equal(1))])
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::UnsupportedOperator);
    assert_eq!(
        err.to_string(),
        "operator mysql::IsEqual is not supported by PostgreSQL; model: Product, field: int_pointer"
    );
}

#[test]
fn posix_patterns_are_validated() {
    let registry = fixtures::registry();

    let query = registry
        .compile([Seller::NAME.is(crate::psql::posix_imatch("^ab+c$"))])
        .unwrap();
    assert_eq!(
        query.sql(),
        "SELECT sellers.* FROM sellers WHERE sellers.name ~* ?"
    );

    let err = registry
        .compile([Seller::NAME.is(crate::psql::posix_match("(unclosed"))])
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidPattern);
}

#[test]
fn perl_extensions_are_not_posix() {
    for pattern in ["\\d+", "^\\w", "(?:ab)c", "(?i)abc", "a*?", "a+?", "a{2}?", "[\\s]"] {
        assert!(super::check_posix(pattern).is_err(), "{pattern}");
    }
    for pattern in [
        "^ab+c$",
        "[*?]",
        "[]a]",
        "[^]a]",
        "[[:alpha:]]+",
        "a{2,3}b",
        "\\.txt$",
        "(ab|cd)*",
    ] {
        assert!(super::check_posix(pattern).is_ok(), "{pattern}");
    }

    let registry = fixtures::registry();
    let err = registry
        .compile([Seller::NAME.is(crate::psql::posix_match("\\d+"))])
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidPattern);

    let err = registry
        .compile([Seller::NAME.is(crate::mysql::regexp("a*?"))])
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidPattern);
}

#[test]
fn invalid_operator_reports_its_error() {
    let operator: Operator<i32> = eq(1).escape('x');
    assert!(operator.error().is_some());
    assert!(eq::<i32>(1).error().is_none());
    assert_eq!(gt::<i32>(1).name(), "Gt");
}
