use super::common::{common_fields, credentials};
use super::StepDescriptor;
use crate::core::schema::SchemaDescription as S;

pub fn schema() -> S {
    common_fields()
        .extend(S::object([
            ("candidate", S::string().required()),
            ("tag", S::string()),
            ("tags", S::array(S::string())),
            ("image_name", S::string()),
            ("registry", S::string()),
            ("credentials", credentials()),
            ("provider", S::string()),
            ("region", S::string()),
            ("accessKeyId", S::string()),
            ("secretAccessKey", S::string()),
        ]))
        .rename("image", "image_name")
}

pub fn step() -> StepDescriptor {
    StepDescriptor::new("push", schema())
}
