use std::env;
use std::path::PathBuf;
use std::process;

use structopt::StructOpt;

use vmlua::common::source::Source;
use vmlua::driver::Driver;
use vmlua::status::Status;

#[derive(StructOpt, Debug)]
#[structopt(name = "vmlua", bin_name = "vmlua", about = "Compile and run a script on the stack machine")]
struct Opt {
    /// Script to compile and run
    input: PathBuf,
}

fn main() {
    let opt = match Opt::from_iter_safe(env::args_os()) {
        Ok(opt) => opt,
        Err(e) => {
            println!("{}", e.message);
            println!("Usage: vmlua <input_file>");
            process::exit(1);
        }
    };

    let source = match Source::path(&opt.input) {
        Ok(source) => source,
        Err(_) => {
            println!("Invalid arguments, check if file exists");
            println!("Usage: vmlua <input_file>");
            process::exit(1);
        }
    };

    // any value but "1" leaves the debugger off
    let debug = env::var("VM_LUA_DEBUG").map(|v| v == "1").unwrap_or(false);

    if let Err(e) = Driver::new(source, debug).run() {
        Status::fatal().log(&e);
        process::exit(1);
    }
}
