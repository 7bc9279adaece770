use dynamorm::DynamormModel;

#[derive(DynamormModel)]
#[dynamorm(table = "widgets", naming = "kebab-case")]
struct Widget {
    #[dynamorm(pk)]
    id: String,
}

fn main() {}
