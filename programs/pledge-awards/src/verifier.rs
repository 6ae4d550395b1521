use anchor_lang::{prelude::*, solana_program::keccak};

/// The entry fields a giver attests to, minus the two carried by
/// accounts (the entry id and its author).
#[derive(AnchorSerialize, AnchorDeserialize, Clone)]
pub struct EntryAttestation {
    pub created_at: i64,
    pub edited_at: Option<i64>,
    pub nonce: u64,
    pub data_hash: [u8; 32],
}

/// Leaf hash of a compressed forum entry. Field order and little-endian
/// integer encoding are the wire contract; an unedited entry hashes
/// `edited_at` as zero.
pub fn compute_entry_hash(
    id: &Pubkey,
    author: &Pubkey,
    created_at: i64,
    edited_at: Option<i64>,
    nonce: u64,
    data_hash: &[u8; 32],
) -> [u8; 32] {
    keccak::hashv(&[
        id.as_ref(),
        author.as_ref(),
        &created_at.to_le_bytes(),
        &edited_at.unwrap_or(0).to_le_bytes(),
        &nonce.to_le_bytes(),
        data_hash.as_ref(),
    ])
    .to_bytes()
}

/// Recomputes the root from a leaf and its sibling path. The index's
/// low bit at each level decides whether the running node is the left
/// or right input.
pub fn verify_inclusion(root: [u8; 32], leaf: [u8; 32], proof: &[[u8; 32]], index: u32) -> bool {
    let mut node = leaf;
    let mut index = index;

    for sibling in proof {
        node = if index & 1 == 0 {
            keccak::hashv(&[&node, sibling]).to_bytes()
        } else {
            keccak::hashv(&[sibling, &node]).to_bytes()
        };
        index >>= 1;
    }

    node == root
}
