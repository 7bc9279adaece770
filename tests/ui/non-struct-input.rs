use dynamorm::DynamormModel;

#[derive(DynamormModel)]
#[dynamorm(table = "widgets")]
enum Widget {
    A,
    B,
}

fn main() {}
