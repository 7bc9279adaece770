use dynamorm::DynamormModel;

#[derive(DynamormModel)]
#[dynamorm(table = "widgets")]
struct Widget {
    #[dynamorm(pk)]
    id: String,
    #[dynamorm(lsi = "by-owner", pk)]
    owner: String,
}

fn main() {}
