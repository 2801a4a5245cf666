use pretty_assertions::assert_eq;
use tether_ir::HostLanguage;

use super::*;

fn type_name_property() -> PropertyDecl {
    PropertyDecl {
        name: "typeName".to_owned(),
        type_name: "String".to_owned(),
        is_static: true,
        is_override: true,
        getter: "\"Callback\"".to_owned(),
        ..PropertyDecl::default()
    }
}

#[test]
fn dialect_lookup_matches_host() {
    for host in HostLanguage::ALL {
        assert_eq!(dialect_for(host).host(), host);
    }
}

#[test]
fn kotlin_class_with_primary_constructor() {
    let decl = ClassDecl {
        name: "MyApp_Callback".to_owned(),
        comment: Some("MyApp.Callback".to_owned()),
        visibility: Visibility::Open,
        base_type: Some("System_MulticastDelegate".to_owned()),
        constructor_params: vec!["handle: Pointer".to_owned()],
        base_constructor_args: vec!["handle".to_owned()],
        members: vec!["val a = 1".to_owned(), "val b = 2".to_owned()],
        ..ClassDecl::default()
    };

    assert_eq!(
        KotlinDialect.render_class(&decl),
        "open class MyApp_Callback /* MyApp.Callback */(handle: Pointer) : System_MulticastDelegate(handle) {\n\
         \x20   val a = 1\n\
         \n\
         \x20   val b = 2\n\
         }"
    );
}

#[test]
fn swift_class_ignores_constructor_params() {
    let decl = ClassDecl {
        name: "MyApp_Callback".to_owned(),
        visibility: Visibility::Open,
        base_type: Some("System_MulticastDelegate".to_owned()),
        interfaces: vec!["Sendable".to_owned()],
        constructor_params: vec!["handle: Pointer".to_owned()],
        members: vec!["let a = 1".to_owned()],
        ..ClassDecl::default()
    };

    assert_eq!(
        SwiftDialect.render_class(&decl),
        "open class MyApp_Callback: System_MulticastDelegate, Sendable {\n    let a = 1\n}"
    );
}

#[test]
fn kotlin_throwing_override_fun() {
    let decl = FunDecl {
        name: "invoke".to_owned(),
        is_override: true,
        throws: true,
        params: vec!["x: Int".to_owned()],
        return_type: Some("Boolean".to_owned()),
        body: "return true".to_owned(),
        ..FunDecl::default()
    };

    assert_eq!(
        KotlinDialect.render_fun(&decl),
        "@Throws(Throwable::class)\noverride fun invoke(x: Int): Boolean {\n    return true\n}"
    );
}

#[test]
fn swift_private_fun_without_return() {
    let decl = FunDecl {
        name: "run".to_owned(),
        visibility: Visibility::Private,
        throws: true,
        body: "work()".to_owned(),
        ..FunDecl::default()
    };

    assert_eq!(
        SwiftDialect.render_fun(&decl),
        "private func run() throws {\n    work()\n}"
    );
}

#[test]
fn kotlin_static_properties_go_into_companion() {
    assert_eq!(
        KotlinDialect.render_properties(&[type_name_property()]),
        "companion object {\n    @JvmStatic\n    val typeName: String get() = \"Callback\"\n}"
    );
}

#[test]
fn swift_static_properties_are_class_vars() {
    assert_eq!(
        SwiftDialect.render_properties(&[type_name_property()]),
        "override class var typeName: String { \"Callback\" }"
    );
}

#[test]
fn bindings() {
    let plain = BindingDecl::immutable("__xC", "x.toInt()");
    let slot = BindingDecl {
        name: "slot".to_owned(),
        mutable: true,
        type_name: Some("Int32".to_owned()),
        value: None,
    };

    assert_eq!(KotlinDialect.render_binding(&plain), "val __xC = x.toInt()");
    assert_eq!(SwiftDialect.render_binding(&plain), "let __xC = x.toInt()");
    assert_eq!(SwiftDialect.render_binding(&slot), "var slot: Int32");
}

#[test]
fn context_guards_carry_message() {
    assert_eq!(
        KotlinDialect.context_guard("ctx"),
        "checkNotNull(ctx) { \"Context is nil\" }"
    );
    assert_eq!(
        SwiftDialect.context_guard("ctx"),
        "guard let ctx else { fatalError(\"Context is nil\") }"
    );
}

#[test]
fn exception_slot_is_passed_by_address_in_swift() {
    assert_eq!(SwiftDialect.exception_slot_arg("__exceptionC"), "&__exceptionC");
    assert_eq!(KotlinDialect.exception_slot_arg("__exceptionC"), "__exceptionC");
}

#[test]
fn closure_types() {
    let params = vec!["Int".to_owned(), "String?".to_owned()];

    assert_eq!(
        KotlinDialect.closure_type(&params, "Boolean"),
        "(Int, String?) -> Boolean"
    );
}
