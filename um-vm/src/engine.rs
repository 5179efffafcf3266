use std::io::{Read, Write};

use um_asm::{Instruction, Word};

use crate::fault::Fault;
use crate::heap::{ArrayHeap, ArrayId};
use crate::io::IoPort;
use crate::registers::Registers;

/// The machine's current lifecycle state.
///
/// `Running` is the only non-terminal state. Once `Halted` or `Faulted`, the
/// machine is done: [`Machine::run`] stops driving the loop and further
/// calls are no-ops that just return the same terminal state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MachineState {
    Running,
    Halted,
    Faulted(Fault),
}

impl MachineState {
    /// `true` for [`MachineState::Running`], `false` for either terminal
    /// state.
    pub fn is_running(&self) -> bool {
        matches!(self, MachineState::Running)
    }

    /// The exit code this state maps to: `0` for a clean halt, non-zero for
    /// a fault. The process contract does not distinguish *which* fault.
    pub fn exit_code(&self) -> i32 {
        match self {
            MachineState::Halted => 0,
            MachineState::Faulted(_) => 1,
            MachineState::Running => {
                unreachable!("exit_code queried before the machine reached a terminal state")
            }
        }
    }
}

/// What a single decoded instruction asks the run loop to do next.
enum Control {
    Continue,
    Halt,
}

/// The interpreter: registers, array heap, I/O port and program counter,
/// wired together by the fetch-decode-execute loop.
///
/// Generic over the I/O streams so tests can drive the machine against
/// in-memory buffers instead of real stdio.
pub struct Machine<R, W> {
    registers: Registers,
    heap: ArrayHeap,
    pc: Word,
    io: IoPort<R, W>,
    state: MachineState,
}

impl<R: Read, W: Write> Machine<R, W> {
    /// Create a machine with `code` loaded into array 0, registers zeroed,
    /// and the program counter at offset 0.
    pub fn new(code: Vec<Word>, input: R, output: W) -> Self {
        Self {
            registers: Registers::ZERO,
            heap: ArrayHeap::new(code),
            pc: 0,
            io: IoPort::new(input, output),
            state: MachineState::Running,
        }
    }

    /// The current lifecycle state.
    pub fn state(&self) -> &MachineState {
        &self.state
    }

    /// The register file, for inspection in tests.
    pub fn registers(&self) -> &Registers {
        &self.registers
    }

    /// The array heap, for inspection in tests.
    pub fn heap(&self) -> &ArrayHeap {
        &self.heap
    }

    /// Run until the machine reaches a terminal state, returning it.
    ///
    /// Output is flushed exactly once, on the way out, whether the machine
    /// halted cleanly or faulted: partial output produced before a fault
    /// must survive the fault. A flush failure is itself reported as a
    /// fault, overriding whatever terminal state the loop reached.
    pub fn run(&mut self) -> &MachineState {
        while self.state.is_running() {
            self.step();
        }
        if let Err(fault) = self.io.flush() {
            self.fault(fault);
        }
        &self.state
    }

    /// Fetch, decode and execute exactly one instruction, updating `state`
    /// in place. A no-op once the machine has reached a terminal state.
    fn step(&mut self) {
        if !self.state.is_running() {
            return;
        }

        let code_len = self
            .heap
            .length(ArrayId::CODE)
            .expect("the code array is always present while the machine is running");

        if self.pc as usize >= code_len {
            self.fault(Fault::ProgramCounterOutOfBounds {
                pc: self.pc,
                length: code_len,
            });
            return;
        }

        let word = self
            .heap
            .read(ArrayId::CODE, self.pc)
            .expect("bounds were just checked");
        self.pc = self.pc.wrapping_add(1);

        let instruction = Instruction::decode(word);
        tracing::trace!(mnemonic = %instruction, ?instruction, pc = self.pc - 1, "fetched instruction");

        match self.execute(instruction) {
            Ok(Control::Continue) => {}
            Ok(Control::Halt) => self.state = MachineState::Halted,
            Err(fault) => self.fault(fault),
        }
    }

    fn fault(&mut self, fault: Fault) {
        tracing::error!(%fault, "machine fault");
        self.state = MachineState::Faulted(fault);
    }

    /// Execute a single decoded instruction against the current state.
    ///
    /// `LOAD_PROGRAM` is the one operation that can replace array 0 out from
    /// under the running program. When it does, [`ArrayHeap::duplicate_into_zero`]
    /// finishes building the new array 0 before this function rebases `pc`
    /// against it, so the old code array's storage is dropped only as a
    /// consequence of that overwrite, never before the new storage and the
    /// rebased counter are both in place. The fast path, `R[b] == 0`, skips
    /// the heap entirely and only reseeks `pc` within the array that is
    /// already running.
    fn execute(&mut self, instruction: Instruction) -> Result<Control, Fault> {
        // Shorthand that closes over `self.registers` without taking
        // ownership of `self`, so the macro can be used alongside mutable
        // borrows of `self.heap` / `self.io` in the same match arm.
        macro_rules! r {
            ($id:expr) => {
                self.registers[$id]
            };
        }

        match instruction {
            Instruction::ConditionalMove { a, b, c } => {
                if r!(c) != 0 {
                    r!(a) = r!(b);
                }
            }

            Instruction::ArrayIndex { a, b, c } => {
                let value = self.heap.read(ArrayId(r!(b)), r!(c))?;
                r!(a) = value;
            }

            Instruction::ArrayUpdate { a, b, c } => {
                self.heap.write(ArrayId(r!(a)), r!(b), r!(c))?;
            }

            Instruction::Add { a, b, c } => {
                r!(a) = r!(b).wrapping_add(r!(c));
            }

            Instruction::Multiply { a, b, c } => {
                r!(a) = r!(b).wrapping_mul(r!(c));
            }

            Instruction::Divide { a, b, c } => {
                let divisor = r!(c);
                if divisor == 0 {
                    return Err(Fault::DivideByZero);
                }
                r!(a) = r!(b) / divisor;
            }

            Instruction::Nand { a, b, c } => {
                r!(a) = !(r!(b) & r!(c));
            }

            Instruction::Halt => return Ok(Control::Halt),

            Instruction::Allocation { b, c } => {
                let id = self.heap.alloc(r!(c))?;
                r!(b) = id.0;
            }

            Instruction::Deallocation { c } => {
                self.heap.free(ArrayId(r!(c)))?;
            }

            Instruction::Output { c } => {
                self.io.output(r!(c))?;
            }

            Instruction::Input { c } => {
                r!(c) = self.io.input()?;
            }

            Instruction::LoadProgram { b, c } => {
                let source = r!(b);
                if source != 0 {
                    self.heap.duplicate_into_zero(ArrayId(source))?;
                }
                self.pc = r!(c);
            }

            Instruction::LoadImmediate { a, value } => {
                r!(a) = value;
            }

            Instruction::Invalid(op) => return Err(Fault::InvalidOpcode(op)),
        }

        Ok(Control::Continue)
    }
}
