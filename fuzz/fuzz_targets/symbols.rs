#![no_main]

use dotpatch::metadata::symbols::MethodDebugRow;
use dotpatch::prelude::*;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let mut module = CompiledModule::new("Fuzz", AssemblyVersion::UNKNOWN);
    let Ok(ty) = module.add_type("Fuzz", "Target") else {
        return;
    };
    let body = MethodBody::new(
        (0..64u32)
            .map(|offset| Instruction::new(offset, "nop", Operand::None))
            .collect(),
    );
    let attributes = MethodAttributes::PUBLIC;
    let Ok(method) = module.add_method(ty, "Run", attributes, vec![], Some(body)) else {
        return;
    };

    let row = data.first().copied().map_or(1, u32::from);
    let mut store = DebugSymbolStore::from_bytes(data.to_vec());
    let document = store.add_document("Fuzz.cs");
    store.add_method(
        method,
        MethodDebugRow {
            document,
            sequence_points: row,
        },
    );
    module.attach_symbols(store);

    let resolver = SourceLocationResolver::new(&module);
    let _ = resolver.resolve(method, None, true);
    let _ = resolver.resolve(method, Some(32), true);
});
