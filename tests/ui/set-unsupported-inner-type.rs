use dynamorm::DynamormModel;

struct NotAScalar;

#[derive(DynamormModel)]
#[dynamorm(table = "widgets")]
struct Widget {
    #[dynamorm(pk)]
    id: String,
    #[dynamorm(set)]
    tags: Vec<NotAScalar>,
}

fn main() {}
