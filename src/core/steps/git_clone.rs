use super::common::{common_fields, credentials};
use super::StepDescriptor;
use crate::core::schema::SchemaDescription as S;

pub fn schema() -> S {
    common_fields().extend(S::object([
        ("repo", S::string().required()),
        ("revision", S::string()),
        ("git", S::string()),
        ("credentials", credentials()),
        ("depth", S::number()),
        ("use_proxy", S::boolean()),
        ("exclude_blobs", S::alternatives([S::boolean(), S::string()])),
    ]))
}

pub fn step() -> StepDescriptor {
    StepDescriptor::new("git-clone", schema())
}
