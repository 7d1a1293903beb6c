use crate::core::schema::SchemaDescription as S;

/// Fields every step type accepts.
pub fn common_fields() -> S {
    S::object([
        ("type", S::string()),
        ("title", S::string()),
        ("description", S::string()),
        ("stage", S::string()),
        ("working_directory", S::string()),
        ("fail_fast", S::boolean()),
        ("strict_fail_fast", S::boolean()),
        ("when", S::map()),
        ("on_success", S::map()),
        ("on_fail", S::map()),
        ("on_finish", S::map()),
        ("hooks", S::map()),
        ("metadata", S::map()),
        ("annotations", S::map()),
        (
            "retry",
            S::object([
                ("maxAttempts", S::number()),
                ("delay", S::number()),
                ("exponentFactor", S::number()),
            ]),
        ),
        ("timeout", S::string()),
    ])
}

/// Username/password pair used by steps that talk to registries or git providers.
pub fn credentials() -> S {
    S::object([("username", S::string()), ("password", S::string())])
}

/// Schema of the pipeline document itself, outside of individual steps.
pub fn root_schema() -> S {
    S::object([
        ("version", S::string().required()),
        ("mode", S::string()),
        ("stages", S::array(S::string())),
        ("fail_fast", S::alternatives([S::boolean(), S::string()])),
        ("strict_fail_fast", S::boolean()),
        ("hooks", S::map()),
        ("build_version", S::string()),
        ("indicators", S::array(S::any())),
        ("services", S::map()),
        ("steps", S::map().required()),
    ])
}
