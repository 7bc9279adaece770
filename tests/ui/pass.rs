use dynamorm::DynamormModel;

#[derive(DynamormModel, Debug)]
#[dynamorm(table = "widgets")]
struct Widget {
    #[dynamorm(pk)]
    id: String,
    #[dynamorm(sk)]
    created_at: aws_smithy_types::DateTime,
    #[dynamorm(index = "by-owner", pk, sparse)]
    owner: Option<String>,
    #[dynamorm(index = "by-owner", sk)]
    rank: i64,
    #[dynamorm(version)]
    version: i64,
    #[dynamorm(updated_at)]
    updated_at: aws_smithy_types::DateTime,
    #[dynamorm(encrypted)]
    notes: Option<String>,
    #[dynamorm(set)]
    tags: Vec<String>,
    #[dynamorm(attr = "legacyName")]
    name: String,
}

fn main() {}
