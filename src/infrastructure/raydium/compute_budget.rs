use solana_sdk::{
    instruction::Instruction,
    compute_budget::ComputeBudgetInstruction,
};

/// Create ComputeBudget instruction to set the priority fee (micro-lamports per CU)
pub fn create_priority_fee_instruction(micro_lamports: u64) -> Instruction {
    ComputeBudgetInstruction::set_compute_unit_price(micro_lamports)
}

/// Create ComputeBudget instruction to set compute unit limit
pub fn create_compute_unit_limit_instruction(compute_units: u32) -> Instruction {
    ComputeBudgetInstruction::set_compute_unit_limit(compute_units)
}

/// ComputeBudget instructions for a swap; the limit is left to the runtime default when unset
pub fn create_compute_budget_instructions(
    compute_units: Option<u32>,
    micro_lamports: u64,
) -> Vec<Instruction> {
    let mut instructions = Vec::with_capacity(2);
    if let Some(units) = compute_units {
        instructions.push(create_compute_unit_limit_instruction(units));
    }
    instructions.push(create_priority_fee_instruction(micro_lamports));
    instructions
}
