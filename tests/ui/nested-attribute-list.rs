use dynamorm::DynamormModel;

#[derive(DynamormModel)]
#[dynamorm(table = "widgets")]
struct Widget {
    #[dynamorm(pk(true))]
    id: String,
}

fn main() {}
