use super::env::TypeEnvironment;
use super::error::TypeError;
use super::ty::TypeExpr;

/// A type environment over the standard registry with the types of the
/// native library bound.
pub fn native_type_environment() -> Result<TypeEnvironment, TypeError> {
    let mut env = TypeEnvironment::standard();
    for (name, ty) in native_types() {
        let ty = env.evaluate(&ty)?;
        env.bind(name, ty);
    }
    Ok(env)
}

fn native_types() -> Vec<(&'static str, TypeExpr)> {
    let number = || TypeExpr::named("number");
    let arithmetic = || TypeExpr::function(number(), TypeExpr::function(number(), number()));
    // both operands of the same type as the first one
    let same_as_first = |result: TypeExpr| {
        TypeExpr::labeled(
            "x",
            TypeExpr::named("any"),
            TypeExpr::function(TypeExpr::type_of("x"), result),
        )
    };
    let equality = || {
        TypeExpr::function(
            TypeExpr::named("any"),
            TypeExpr::function(TypeExpr::named("any"), TypeExpr::named("boolean")),
        )
    };

    let mut types = vec![
        ("(+)", same_as_first(TypeExpr::type_of("x"))),
        ("(-)", arithmetic()),
        ("(*)", arithmetic()),
        ("(/)", arithmetic()),
        ("(==)", equality()),
        ("(!=)", equality()),
    ];
    for comparison in ["(<)", "(<=)", "(>)", "(>=)"] {
        types.push((comparison, same_as_first(TypeExpr::named("boolean"))));
    }
    types.push((
        "if",
        TypeExpr::labeled(
            "condition",
            TypeExpr::named("boolean"),
            TypeExpr::labeled(
                "then",
                TypeExpr::named("any"),
                TypeExpr::function(TypeExpr::type_of("then"), TypeExpr::type_of("then")),
            ),
        ),
    ));
    types
}
