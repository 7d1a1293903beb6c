use super::common::common_fields;
use super::StepDescriptor;
use crate::core::schema::SchemaDescription as S;

pub fn schema() -> S {
    common_fields()
        .extend(S::object([
            ("image", S::string().required()),
            ("commands", S::string_or_list()),
            ("cmd", S::array(S::string())),
            ("entry_point", S::string_or_list()),
            ("shell", S::string()),
            (
                "environment",
                S::alternatives([S::array(S::string()), S::map()]),
            ),
            ("volumes", S::array(S::string())),
            ("services", S::map()),
            ("registry_context", S::string()),
        ]))
        .rename("entrypoint", "entry_point")
}

pub fn step() -> StepDescriptor {
    StepDescriptor::new("freestyle", schema())
}
