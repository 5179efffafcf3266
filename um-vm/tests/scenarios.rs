//! The concrete end-to-end scenarios a program image must satisfy, run
//! against the public `Machine` API with no knowledge of its internals.

use std::io::Cursor;

use um_asm::{Instruction as I, Word};
use um_vm::{Fault, Machine, MachineState};

fn assemble(instructions: &[I]) -> Vec<Word> {
    instructions.iter().map(|i| i.encode()).collect()
}

fn run(code: Vec<Word>) -> (MachineState, Vec<u8>) {
    let mut output = Vec::new();
    let state = {
        let mut machine = Machine::new(code, Cursor::new(Vec::<u8>::new()), &mut output);
        machine.run().clone()
    };
    (state, output)
}

#[test]
fn scenario_1_minimal_halt() {
    let (state, output) = run(vec![0x7000_0000]);
    assert_eq!(state, MachineState::Halted);
    assert!(output.is_empty());
}

#[test]
fn scenario_2_print_one_character() {
    let code = assemble(&[I::LoadImmediate { a: 1, value: 65 }, I::Output { c: 1 }, I::Halt]);
    // Cross-check the documented raw encodings for the first two words.
    assert_eq!(code[0], 0xD200_0041);
    assert_eq!(code[1], 0xA000_0001);

    let (state, output) = run(code);
    assert_eq!(state, MachineState::Halted);
    assert_eq!(output, b"A");
}

#[test]
fn scenario_3_add_and_output() {
    let code = assemble(&[
        I::LoadImmediate { a: 1, value: 48 },
        I::LoadImmediate { a: 2, value: 1 },
        I::Add { a: 3, b: 1, c: 2 },
        I::Output { c: 3 },
        I::Halt,
    ]);
    let (state, output) = run(code);
    assert_eq!(state, MachineState::Halted);
    assert_eq!(output, b"1");
}

#[test]
fn scenario_4_allocate_write_read_output() {
    let code = assemble(&[
        I::LoadImmediate { a: 7, value: 1 },
        I::Allocation { b: 2, c: 7 },
        I::LoadImmediate { a: 3, value: 66 },
        I::LoadImmediate { a: 4, value: 0 },
        I::ArrayUpdate { a: 2, b: 4, c: 3 },
        I::ArrayIndex { a: 5, b: 2, c: 4 },
        I::Output { c: 5 },
        I::Halt,
    ]);
    let (state, output) = run(code);
    assert_eq!(state, MachineState::Halted);
    assert_eq!(output, b"B");
}

#[test]
fn scenario_5_divide_by_zero() {
    let code = assemble(&[
        I::LoadImmediate { a: 1, value: 10 },
        I::LoadImmediate { a: 2, value: 0 },
        I::Divide { a: 3, b: 1, c: 2 },
    ]);
    let (state, output) = run(code);
    assert_eq!(state, MachineState::Faulted(Fault::DivideByZero));
    assert!(output.is_empty());
}

#[test]
fn scenario_6_self_modifying_jump_skips_intervening_instructions() {
    let code = assemble(&[
        I::LoadImmediate { a: 1, value: 3 }, // 0: offset of the HALT below
        I::LoadProgram { b: 0, c: 1 },        // 1: jump there, fast path
        I::Output { c: 1 },                   // 2: skipped
        I::Halt,                              // 3
    ]);
    let (state, output) = run(code);
    assert_eq!(state, MachineState::Halted);
    assert!(output.is_empty());
}

#[test]
fn scenario_7_self_replacing_program_runs_the_new_code() {
    let replacement = assemble(&[
        I::LoadImmediate { a: 1, value: 89 }, // 'Y'
        I::Output { c: 1 },
        I::Halt,
    ]);
    let replacement_len = replacement.len() as Word;

    let mut main = vec![
        I::LoadImmediate { a: 7, value: replacement_len }.encode(),
        I::Allocation { b: 2, c: 7 }.encode(),
    ];
    for (offset, word) in replacement.iter().enumerate() {
        main.push(I::LoadImmediate { a: 3, value: *word }.encode());
        main.push(I::LoadImmediate { a: 4, value: offset as Word }.encode());
        main.push(I::ArrayUpdate { a: 2, b: 4, c: 3 }.encode());
    }
    main.push(I::LoadImmediate { a: 5, value: 0 }.encode());
    main.push(I::LoadProgram { b: 2, c: 5 }.encode());
    // If LOAD_PROGRAM failed to actually replace array 0, execution falls
    // through to here and emits a byte the replacement program never does.
    main.push(I::LoadImmediate { a: 6, value: 1 }.encode());
    main.push(I::Output { c: 6 }.encode());
    main.push(I::Halt.encode());

    let (state, output) = run(main);
    assert_eq!(state, MachineState::Halted);
    assert_eq!(output, b"Y");
}

#[test]
fn boundary_output_256_faults_255_emits_0xff() {
    let (state, _) = run(assemble(&[I::LoadImmediate { a: 1, value: 256 }, I::Output { c: 1 }]));
    assert_eq!(state, MachineState::Faulted(Fault::OutputOutOfRange(256)));

    let (state, output) = run(assemble(&[
        I::LoadImmediate { a: 1, value: 255 },
        I::Output { c: 1 },
        I::Halt,
    ]));
    assert_eq!(state, MachineState::Halted);
    assert_eq!(output, vec![0xffu8]);
}

#[test]
fn boundary_input_at_eof_is_all_ones() {
    let code = assemble(&[I::Input { c: 1 }, I::LoadImmediate { a: 2, value: 0xffff_ffff & 0x01ff_ffff }]);
    let mut output = Vec::new();
    let mut machine = Machine::new(code, Cursor::new(Vec::<u8>::new()), &mut output);
    machine.run();
    assert_eq!(machine.registers()[1], Word::MAX);
}

#[test]
fn boundary_deallocating_id_zero_faults() {
    let code = assemble(&[I::LoadImmediate { a: 1, value: 0 }, I::Deallocation { c: 1 }]);
    let (state, _) = run(code);
    assert_eq!(state, MachineState::Faulted(Fault::DeallocateReserved));
}

#[test]
fn boundary_load_program_to_end_of_array_faults_on_next_fetch() {
    // R[1] := length(array 0) = 2, then jump there.
    let code = assemble(&[I::LoadImmediate { a: 1, value: 2 }, I::LoadProgram { b: 0, c: 1 }]);
    let (state, _) = run(code);
    assert_eq!(
        state,
        MachineState::Faulted(Fault::ProgramCounterOutOfBounds { pc: 2, length: 2 })
    );
}
