//! Host import table.
//!
//! Compiled song modules are built against a tiny numeric ABI: three math
//! functions under the `"m"` namespace. Modules compiled with those ops
//! inlined import nothing and instantiate against an empty table.

use wasmtime::Linker;

use crate::config::ImportTable;
use crate::error::{RenderError, Result};

/// Namespace the song modules import their math functions under.
pub const IMPORT_NAMESPACE: &str = "m";

/// Install the configured import table on `linker`.
pub fn add_imports(linker: &mut Linker<()>, table: ImportTable) -> Result<()> {
    match table {
        ImportTable::None => Ok(()),
        ImportTable::Math3 => add_math3(linker),
    }
}

fn add_math3(linker: &mut Linker<()>) -> Result<()> {
    linker
        .func_wrap(IMPORT_NAMESPACE, "pow", |a: f64, b: f64| a.powf(b))
        .and_then(|l| l.func_wrap(IMPORT_NAMESPACE, "log2", |x: f64| x.log2()))
        .and_then(|l| l.func_wrap(IMPORT_NAMESPACE, "sin", |x: f64| x.sin()))
        .map_err(RenderError::Module)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use wasmtime::{Engine, Linker, Module, Store};

    use super::*;

    /// A module that computes pow(2, 10) + log2(8) + sin(0) through the host
    /// imports and stores the f64 result at memory offset 0.
    const MATH_WAT: &str = r#"
        (module
          (import "m" "pow" (func $pow (param f64 f64) (result f64)))
          (import "m" "log2" (func $log2 (param f64) (result f64)))
          (import "m" "sin" (func $sin (param f64) (result f64)))
          (memory (export "m") 1)
          (func (export "render")
            (f64.store (i32.const 0)
              (f64.add
                (f64.add
                  (call $pow (f64.const 2) (f64.const 10))
                  (call $log2 (f64.const 8)))
                (call $sin (f64.const 0))))))
    "#;

    #[test]
    fn math3_imports_compute_through_host_functions() {
        let engine = Engine::default();
        let module = Module::new(&engine, MATH_WAT).unwrap();
        let mut linker = Linker::new(&engine);
        add_imports(&mut linker, ImportTable::Math3).unwrap();

        let mut store = Store::new(&engine, ());
        let instance = linker.instantiate(&mut store, &module).unwrap();
        instance
            .get_typed_func::<(), ()>(&mut store, "render")
            .unwrap()
            .call(&mut store, ())
            .unwrap();

        let memory = instance.get_memory(&mut store, "m").unwrap();
        let mut buf = [0u8; 8];
        buf.copy_from_slice(&memory.data(&store)[0..8]);
        // 1024 + 3 + 0
        assert_eq!(f64::from_le_bytes(buf), 1027.0);
    }

    #[test]
    fn none_table_installs_nothing() {
        let engine = Engine::default();
        let module = Module::new(&engine, MATH_WAT).unwrap();
        let mut linker = Linker::new(&engine);
        add_imports(&mut linker, ImportTable::None).unwrap();

        let mut store = Store::new(&engine, ());
        assert!(linker.instantiate(&mut store, &module).is_err());
    }
}
