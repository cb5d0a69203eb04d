fn main() {
    println!("cargo:rerun-if-changed=proto/rdf.proto");
    protobuf_codegen::Codegen::new()
        .pure()
        .cargo_out_dir("jelly-rdf")
        .input("proto/rdf.proto")
        .include("proto")
        .run_from_script();
}
