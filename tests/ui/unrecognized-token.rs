use dynamorm::DynamormModel;

#[derive(DynamormModel)]
#[dynamorm(table = "widgets")]
struct Widget {
    #[dynamorm(pk)]
    id: String,
    #[dynamorm(frobnicate)]
    name: String,
}

fn main() {}
