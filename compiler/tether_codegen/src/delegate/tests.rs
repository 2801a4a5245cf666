use pretty_assertions::assert_eq;
use tether_ir::{
    HostLanguage, InvokeSignature, Nullability, ParamInfo, ParamMode, ReflectedType,
    ReflectionSource, TypeKey, TypeKind, TypeUniverse,
};
use tether_types::TypeDescriptorRegistry;

use super::*;
use crate::FeatureFlags;

fn int_to_bool(universe: &mut TypeUniverse) -> TypeKey {
    universe.register(ReflectedType::delegate(
        "MyApp.Callback",
        InvokeSignature::new(vec![ParamInfo::new("x", TypeKey::INT32)], TypeKey::BOOL),
    ))
}

fn generate(
    universe: &TypeUniverse,
    config: &GeneratorConfig,
    key: TypeKey,
) -> Result<DelegateBinding, GenerationProblem> {
    let registry = TypeDescriptorRegistry::new(universe, config.resolver());
    let upstream = UpstreamState::conventional(universe, &universe.keys());
    DelegateBindingGenerator::new(&registry, config).generate(key, &upstream)
}

fn binding_or_panic(result: Result<DelegateBinding, GenerationProblem>) -> DelegateBinding {
    match result {
        Ok(binding) => binding,
        Err(problem) => panic!("unexpected problem: {problem}"),
    }
}

#[test]
fn swift_invoke_adapter() {
    let mut universe = TypeUniverse::new();
    let callback = int_to_bool(&mut universe);
    let config = GeneratorConfig::new(HostLanguage::Swift);

    let binding = binding_or_panic(generate(&universe, &config, callback));

    assert_eq!(binding.invoke.native_function, "MyApp_Callback_Invoke");
    assert_eq!(
        binding.invoke.native_args,
        vec!["__selfC", "x", "&__exceptionC"]
    );
    assert!(!binding.invoke.is_override);
    assert_eq!(
        binding.invoke.text,
        "open func invoke(_ x: Int32) throws -> Bool {\n\
         \x20   var __exceptionC: System_Exception_t?\n\
         \x20   let __selfC = self.__handle\n\
         \n\
         \x20   let __returnValueC = MyApp_Callback_Invoke(__selfC, x, &__exceptionC)\n\
         \n\
         \x20   if let __exceptionC {\n\
         \x20       let __exception = System_Exception(handle: __exceptionC)\n\
         \x20       let __error = __exception.swiftError\n\
         \n\
         \x20       throw __error\n\
         \x20   }\n\
         \n\
         \x20   return __returnValueC\n\
         }"
    );
}

#[test]
fn kotlin_callable_factory_converts_and_suppresses_destroy() {
    let mut universe = TypeUniverse::new();
    let widget = universe.register(ReflectedType::class("MyApp.Widget"));
    let factory = universe.register(ReflectedType::delegate(
        "MyApp.WidgetFactory",
        InvokeSignature::new(vec![ParamInfo::new("id", TypeKey::UINT32)], widget),
    ));
    let config = GeneratorConfig::new(HostLanguage::Kotlin);

    let binding = binding_or_panic(generate(&universe, &config, factory));

    assert_eq!(
        binding.create_callable.return_type,
        "MyApp_WidgetFactory_CFunction_t"
    );
    assert_eq!(
        binding.create_callable.text,
        "private fun __createCFunction(): MyApp_WidgetFactory_CFunction_t {\n\
         \x20   return MyApp_WidgetFactory_CFunction_t { __innerContext, id ->\n\
         \x20       checkNotNull(__innerContext) { \"Context is nil\" }\n\
         \n\
         \x20       val __innerKotlinContext = NativeBox.fromPointer<(UInt) -> MyApp_Widget>(__innerContext)\n\
         \x20       val __innerClosure = __innerKotlinContext.value\n\
         \n\
         \x20       val __idKotlin = id.toUInt()\n\
         \n\
         \x20       val __returnValueKotlin = __innerClosure(__idKotlin)\n\
         \x20       val __returnValue = __returnValueKotlin.__handle\n\
         \x20       __returnValueKotlin.__destroyMode = DestroyMode.SKIP // Will be destroyed by the managed runtime\n\
         \n\
         \x20       return@MyApp_WidgetFactory_CFunction_t __returnValue\n\
         \x20   }\n\
         }"
    );
}

#[test]
fn nullable_reference_return_uses_optional_chaining() {
    let mut universe = TypeUniverse::new();
    let widget = universe.register(ReflectedType::class("MyApp.Widget"));
    let mut signature = InvokeSignature::new(Vec::new(), widget);
    signature.return_nullability = Nullability::Nullable;
    let finder = universe.register(ReflectedType::delegate("MyApp.Finder", signature));
    let config = GeneratorConfig::new(HostLanguage::Swift);

    let binding = binding_or_panic(generate(&universe, &config, finder));

    assert!(binding
        .create_callable
        .text
        .contains("__returnValueSwift?.__destroyMode = .skip"));
    assert!(binding
        .invoke
        .text
        .contains("let __returnValue = __returnValueC.map { MyApp_Widget(handle: $0) }"));
    assert!(binding.invoke.text.contains("throws -> MyApp_Widget? {"));
}

#[test]
fn primitive_return_has_no_destroy_suppression() {
    let mut universe = TypeUniverse::new();
    let callback = int_to_bool(&mut universe);

    for host in HostLanguage::ALL {
        let binding =
            binding_or_panic(generate(&universe, &GeneratorConfig::new(host), callback));
        assert!(!binding.create_callable.text.contains("__destroyMode"));
    }
}

#[test]
fn void_callable_calls_closure_without_return() {
    let mut universe = TypeUniverse::new();
    let action = universe.register(ReflectedType::delegate(
        "MyApp.Action",
        InvokeSignature::new(vec![ParamInfo::new("message", TypeKey::STRING)], TypeKey::VOID),
    ));
    let config = GeneratorConfig::new(HostLanguage::Swift);

    let binding = binding_or_panic(generate(&universe, &config, action));

    assert_eq!(
        binding.create_callable.text,
        "private func __createCFunction() -> MyApp_Action_CFunction_t {\n\
         \x20   return { __innerContext, message in\n\
         \x20       guard let __innerContext else { fatalError(\"Context is nil\") }\n\
         \n\
         \x20       let __innerSwiftContext = NativeBox<(String) -> Void>.fromPointer(__innerContext)\n\
         \x20       let __innerClosure = __innerSwiftContext.value\n\
         \n\
         \x20       let __messageSwift = String(dotNETString: message)\n\
         \n\
         \x20       __innerClosure(__messageSwift)\n\
         \x20   }\n\
         }"
    );
    assert!(!binding.invoke.is_returning);
    assert!(!binding.invoke.text.contains("return"));
}

#[test]
fn destructor_factory_releases_context() {
    let mut universe = TypeUniverse::new();
    let callback = int_to_bool(&mut universe);
    let config = GeneratorConfig::new(HostLanguage::Kotlin);

    let binding = binding_or_panic(generate(&universe, &config, callback));

    assert_eq!(binding.create_destructor.name, "__createCDestructorFunction");
    assert_eq!(
        binding.create_destructor.text,
        "private fun __createCDestructorFunction(): MyApp_Callback_CDestructorFunction_t {\n\
         \x20   return MyApp_Callback_CDestructorFunction_t { __innerContext ->\n\
         \x20       checkNotNull(__innerContext) { \"Context is nil\" }\n\
         \n\
         \x20       NativeBox.release<(Int) -> Boolean>(__innerContext)\n\
         \x20   }\n\
         }"
    );
}

#[test]
fn kotlin_type_identity_lives_in_companion() {
    let mut universe = TypeUniverse::new();
    let callback = int_to_bool(&mut universe);
    let config = GeneratorConfig::new(HostLanguage::Kotlin);

    let binding = binding_or_panic(generate(&universe, &config, callback));

    assert_eq!(
        binding.type_identity,
        "companion object {\n\
         \x20   @JvmStatic\n\
         \x20   val typeName: String get() = \"Callback\"\n\
         \n\
         \x20   @JvmStatic\n\
         \x20   val fullTypeName: String get() = \"MyApp.Callback\"\n\
         }"
    );
}

#[test]
fn class_wraps_every_member() {
    let mut universe = TypeUniverse::new();
    let callback = int_to_bool(&mut universe);
    let config = GeneratorConfig::new(HostLanguage::Kotlin);

    let binding = binding_or_panic(generate(&universe, &config, callback));

    assert!(binding.text.starts_with(
        "open class MyApp_Callback /* MyApp.Callback */(handle: Pointer) : System_MulticastDelegate(handle) {\n"
    ));
    assert!(binding.text.ends_with("\n}"));
    let identity = binding.text.find("typeName");
    let callable = binding.text.find("__createCFunction");
    let destructor = binding.text.find("__createCDestructorFunction");
    let invoke = binding.text.find("fun invoke(");
    assert!(identity < callable && callable < destructor && destructor < invoke);
    assert!(identity.is_some());
}

#[test]
fn override_when_base_delegate_signature_matches() {
    let mut universe = TypeUniverse::new();
    let base = int_to_bool(&mut universe);
    let derived = universe.register(
        ReflectedType::delegate(
            "MyApp.DerivedCallback",
            InvokeSignature::new(vec![ParamInfo::new("value", TypeKey::INT32)], TypeKey::BOOL),
        )
        .with_base(base),
    );
    let config = GeneratorConfig::new(HostLanguage::Kotlin);

    let binding = binding_or_panic(generate(&universe, &config, derived));

    assert!(binding.invoke.is_override);
    assert!(binding.invoke.text.contains("override fun invoke(value: Int): Boolean {"));
    assert!(binding.text.contains(": MyApp_Callback(handle) {"));
}

#[test]
fn no_override_when_base_signature_differs() {
    let mut universe = TypeUniverse::new();
    let base = int_to_bool(&mut universe);
    let derived = universe.register(
        ReflectedType::delegate(
            "MyApp.WideCallback",
            InvokeSignature::new(vec![ParamInfo::new("x", TypeKey::INT64)], TypeKey::BOOL),
        )
        .with_base(base),
    );
    let config = GeneratorConfig::new(HostLanguage::Swift);

    let binding = binding_or_panic(generate(&universe, &config, derived));

    assert!(!binding.invoke.is_override);
}

#[test]
fn parameter_modes_are_rejected() {
    for (mode, label) in [
        (ParamMode::Out, "out parameters"),
        (ParamMode::In, "in parameters"),
        (ParamMode::Ref, "by ref parameters"),
    ] {
        let mut universe = TypeUniverse::new();
        let key = universe.register(ReflectedType::delegate(
            "MyApp.Modal",
            InvokeSignature::new(
                vec![ParamInfo::new("x", TypeKey::INT32).with_mode(mode)],
                TypeKey::VOID,
            ),
        ));
        let config = GeneratorConfig::new(HostLanguage::Kotlin);

        let problem = generate(&universe, &config, key).map(|b| b.text);

        assert_eq!(
            problem,
            Err(GenerationProblem::UnsupportedParameter {
                host: HostLanguage::Kotlin,
                mode,
            })
        );
        if let Err(problem) = problem {
            assert!(problem.to_string().contains(label));
        }
    }
}

#[test]
fn by_ref_parameters_behind_feature_flag() {
    let mut universe = TypeUniverse::new();
    let key = universe.register(ReflectedType::delegate(
        "MyApp.Counter",
        InvokeSignature::new(
            vec![ParamInfo::new("count", TypeKey::INT32).with_mode(ParamMode::Ref)],
            TypeKey::VOID,
        ),
    ));
    let config = GeneratorConfig::new(HostLanguage::Kotlin)
        .with_features(FeatureFlags::BY_REF_DELEGATE_PARAMETERS);

    let binding = binding_or_panic(generate(&universe, &config, key));

    assert!(binding
        .invoke
        .text
        .contains("fun invoke(count: DNRef<Int>) {"));
    assert!(binding.invoke.text.contains("val __countC = count.__pointer"));
    assert!(binding
        .create_callable
        .text
        .contains("val __countKotlin = DNRef<Int>(count)"));
}

#[test]
fn by_ref_parameters_stay_unsupported_in_swift() {
    let mut universe = TypeUniverse::new();
    let key = universe.register(ReflectedType::delegate(
        "MyApp.Counter",
        InvokeSignature::new(
            vec![ParamInfo::new("count", TypeKey::INT32).with_mode(ParamMode::Ref)],
            TypeKey::VOID,
        ),
    ));
    let config = GeneratorConfig::new(HostLanguage::Swift)
        .with_features(FeatureFlags::BY_REF_DELEGATE_PARAMETERS);

    let problem = generate(&universe, &config, key).map(|b| b.text);

    assert!(matches!(problem, Err(GenerationProblem::Conversion(_))));
}

#[test]
fn by_ref_return_is_rejected() {
    let mut universe = TypeUniverse::new();
    let mut signature = InvokeSignature::new(Vec::new(), TypeKey::INT32);
    signature.returns_by_ref = true;
    let key = universe.register(ReflectedType::delegate("MyApp.RefGetter", signature));
    let config = GeneratorConfig::new(HostLanguage::Swift);

    assert_eq!(
        generate(&universe, &config, key).map(|b| b.text),
        Err(GenerationProblem::ByRefReturn {
            host: HostLanguage::Swift
        })
    );
}

#[test]
fn non_delegates_and_nameless_types_are_skipped() {
    let mut universe = TypeUniverse::new();
    let widget = universe.register(ReflectedType::class("MyApp.Widget"));
    let nameless = universe.register(ReflectedType::new("<>c", None, TypeKind::Delegate));
    let config = GeneratorConfig::default();

    assert_eq!(
        generate(&universe, &config, widget).map(|b| b.text),
        Err(GenerationProblem::NotADelegate)
    );
    assert_eq!(
        generate(&universe, &config, nameless).map(|b| b.text),
        Err(GenerationProblem::NoFullName)
    );
}

#[test]
fn delegate_without_invoke_is_skipped() {
    let mut universe = TypeUniverse::new();
    let key = universe.register(
        ReflectedType::new("Broken", Some("MyApp.Broken".to_owned()), TypeKind::Delegate)
            .with_base(TypeKey::MULTICAST_DELEGATE),
    );
    let config = GeneratorConfig::default();

    assert_eq!(
        generate(&universe, &config, key).map(|b| b.text),
        Err(GenerationProblem::MissingInvoke {
            host: HostLanguage::Kotlin
        })
    );
}

#[test]
fn unmanaged_pointer_parameter_has_no_conversion() {
    let mut universe = TypeUniverse::new();
    let pointer = universe.register(ReflectedType::new(
        "Int32*",
        Some("System.Int32*".to_owned()),
        TypeKind::Pointer {
            pointee: TypeKey::INT32,
        },
    ));
    let key = universe.register(ReflectedType::delegate(
        "MyApp.Raw",
        InvokeSignature::new(vec![ParamInfo::new("p", pointer)], TypeKey::VOID),
    ));
    let config = GeneratorConfig::default();

    let problem = generate(&universe, &config, key).map(|b| b.text);

    assert!(matches!(problem, Err(GenerationProblem::Conversion(_))));
    if let Err(problem) = problem {
        assert!(!problem.is_fatal());
    }
}

#[test]
fn missing_native_layer_is_fatal() {
    let mut universe = TypeUniverse::new();
    let callback = int_to_bool(&mut universe);
    let config = GeneratorConfig::default();
    let registry = TypeDescriptorRegistry::new(&universe, config.resolver());
    let generator = DelegateBindingGenerator::new(&registry, &config);

    let problem = generator
        .generate(callback, &UpstreamState::new())
        .map(|b| b.text);

    assert_eq!(
        problem,
        Err(GenerationProblem::MissingNativeLayer {
            type_name: "MyApp.Callback".to_owned()
        })
    );
}

#[test]
fn foreign_native_layer_is_fatal() {
    let mut universe = TypeUniverse::new();
    let callback = int_to_bool(&mut universe);
    let config = GeneratorConfig::default();
    let registry = TypeDescriptorRegistry::new(&universe, config.resolver());
    let generator = DelegateBindingGenerator::new(&registry, &config);
    let mut upstream = UpstreamState::new();
    upstream.record(callback, NativeLayerArtifacts::conventional("MyApp_Other"));

    let problem = generator.generate(callback, &upstream).map(|b| b.text);

    assert_eq!(
        problem,
        Err(GenerationProblem::NativeLayerMismatch {
            type_name: "MyApp.Callback".to_owned(),
            expected: "MyApp_Callback".to_owned(),
            found: "MyApp_Other".to_owned(),
        })
    );
    assert!(matches!(problem, Err(p) if p.is_fatal()));
}

#[test]
fn generator_uses_dialect_of_configured_host() {
    let universe = TypeUniverse::new();
    let registry = TypeDescriptorRegistry::new(&universe, GeneratorConfig::default().resolver());

    for host in HostLanguage::ALL {
        let config = GeneratorConfig::new(host);
        let generator = DelegateBindingGenerator::new(&registry, &config);
        assert_eq!(generator.dialect().host(), host);
    }
}

fn error_reporter(universe: &mut TypeUniverse) -> TypeKey {
    universe.register(ReflectedType::delegate(
        "MyApp.OnError",
        InvokeSignature::new(
            vec![
                ParamInfo::new("exception", TypeKey::STRING),
                ParamInfo::new("returnValue", TypeKey::STRING),
            ],
            TypeKey::STRING,
        ),
    ))
}

#[test]
fn parameter_temporaries_do_not_shadow_kotlin_locals() {
    let mut universe = TypeUniverse::new();
    let key = error_reporter(&mut universe);
    let config = GeneratorConfig::new(HostLanguage::Kotlin);

    let binding = binding_or_panic(generate(&universe, &config, key));

    let invoke = &binding.invoke;
    assert_eq!(
        invoke.native_args,
        vec!["__selfC", "__p_exceptionC", "__p_returnValueC", "__exceptionC"]
    );
    assert_eq!(invoke.text.matches("val __exceptionC =").count(), 1);
    assert!(invoke.text.contains("    val __p_exceptionC = exception.toDotNETString()\n"));
    assert!(invoke.text.contains("    val __p_returnValueC = returnValue.toDotNETString()\n"));
    assert_eq!(invoke.text.matches("val __returnValueC =").count(), 1);

    let callable = &binding.create_callable.text;
    assert!(callable.contains(
        "val __returnValueKotlin = __innerClosure(__exceptionKotlin, __p_returnValueKotlin)"
    ));
    assert_eq!(callable.matches("val __returnValueKotlin =").count(), 1);
}

#[test]
fn parameter_temporaries_do_not_shadow_swift_locals() {
    let mut universe = TypeUniverse::new();
    let key = error_reporter(&mut universe);
    let config = GeneratorConfig::new(HostLanguage::Swift);

    let binding = binding_or_panic(generate(&universe, &config, key));

    let invoke = &binding.invoke;
    assert_eq!(
        invoke.native_args,
        vec!["__selfC", "__p_exceptionC", "__p_returnValueC", "&__exceptionC"]
    );
    assert!(invoke.text.contains("    var __exceptionC: System_Exception_t?\n"));
    assert!(!invoke.text.contains("let __exceptionC ="));
    assert_eq!(invoke.text.matches("let __returnValueC =").count(), 1);

    let callable = &binding.create_callable.text;
    assert!(callable.contains(
        "let __returnValueSwift = __innerClosure(__exceptionSwift, __p_returnValueSwift)"
    ));
    assert_eq!(callable.matches("let __returnValueSwift =").count(), 1);
}

#[test]
fn missing_native_layer_outranks_unsupported_signature() {
    let mut universe = TypeUniverse::new();
    let key = universe.register(ReflectedType::delegate(
        "MyApp.TryParse",
        InvokeSignature::new(
            vec![ParamInfo::new("result", TypeKey::INT32).with_mode(ParamMode::Out)],
            TypeKey::BOOL,
        ),
    ));
    let config = GeneratorConfig::default();
    let registry = TypeDescriptorRegistry::new(&universe, config.resolver());
    let generator = DelegateBindingGenerator::new(&registry, &config);

    let problem = generator.generate(key, &UpstreamState::new()).map(|b| b.text);

    assert_eq!(
        problem,
        Err(GenerationProblem::MissingNativeLayer {
            type_name: "MyApp.TryParse".to_owned()
        })
    );
    assert!(matches!(problem, Err(p) if p.is_fatal()));
}

#[test]
fn unbindable_base_is_not_overridden() {
    let mut universe = TypeUniverse::new();
    let base = universe.register(
        ReflectedType::delegate(
            "MyApp.Callback",
            InvokeSignature::new(vec![ParamInfo::new("x", TypeKey::INT32)], TypeKey::BOOL),
        )
        .with_base(TypeKey::from_raw(9999)),
    );
    let derived = universe.register(
        ReflectedType::delegate(
            "MyApp.DerivedCallback",
            InvokeSignature::new(vec![ParamInfo::new("value", TypeKey::INT32)], TypeKey::BOOL),
        )
        .with_base(base),
    );
    let config = GeneratorConfig::new(HostLanguage::Kotlin);

    assert!(matches!(
        generate(&universe, &config, base),
        Err(GenerationProblem::UnresolvableType(_))
    ));
    let binding = binding_or_panic(generate(&universe, &config, derived));

    assert!(!binding.invoke.is_override);
    assert!(binding.invoke.text.contains("\nopen fun invoke(value: Int): Boolean {"));
}
