use super::common::common_fields;
use super::StepDescriptor;
use crate::core::schema::SchemaDescription as S;

pub fn schema() -> S {
    common_fields().extend(S::object([
        (
            "composition",
            S::alternatives([S::string(), S::map()]).required(),
        ),
        ("composition_candidates", S::map().required()),
        ("composition_variables", S::array(S::string())),
        ("add_flow_volume_to_composition", S::boolean()),
    ]))
}

pub fn step() -> StepDescriptor {
    StepDescriptor::new("composition", schema())
}
