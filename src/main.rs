use anyhow::Result;

fn main() -> Result<()> {
    dcc_driver::main()
}
