use super::common::common_fields;
use super::StepDescriptor;
use crate::core::schema::SchemaDescription as S;

pub fn schema() -> S {
    common_fields()
        .extend(S::object([
            ("image_name", S::string().required()),
            ("tag", S::string()),
            ("tags", S::array(S::string())),
            (
                "dockerfile",
                S::alternatives([S::string(), S::object([("content", S::string())])]),
            ),
            ("build_arguments", S::array(S::string())),
            ("target", S::string()),
            ("no_cache", S::boolean()),
            ("no_cf_cache", S::boolean()),
            ("squash", S::boolean()),
            ("buildkit", S::boolean()),
            ("disable_push", S::boolean()),
            ("registry", S::string()),
            ("registry_contexts", S::array(S::string())),
            ("platform", S::string()),
            (
                "buildx",
                S::alternatives([
                    S::boolean(),
                    S::object([
                        (
                            "qemu",
                            S::object([("image", S::string()), ("platforms", S::string())]),
                        ),
                        (
                            "builder",
                            S::object([
                                ("driver", S::string()),
                                ("driver_opts", S::string()),
                            ]),
                        ),
                    ]),
                ]),
            ),
            (
                "cosign",
                S::object([("sign", S::boolean()), ("options", S::map())]),
            ),
        ]))
        .rename("build_args", "build_arguments")
}

pub fn step() -> StepDescriptor {
    StepDescriptor::new("build", schema())
}
