use dynamorm::DynamormModel;

#[derive(DynamormModel)]
#[dynamorm(table = "widgets")]
struct Widget {
    #[dynamorm(pk)]
    id: String,
    #[dynamorm(attr)]
    name: String,
}

fn main() {}
