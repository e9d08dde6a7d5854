use std::error::Error;

fn main() -> Result<(), Box<dyn Error>> {
    cord_sampler::apps::init_tracing();
    cord_sampler::apps::run_verify_sample(std::env::args().skip(1))
}
