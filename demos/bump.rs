use std::io::Read;
use std::ptr;

use libc::sbrk;
use rallocator::Allocator;

/// Waits until the user presses ENTER.
/// Useful when you want to inspect memory state with tools like `pmap`, `htop`,
/// `gdb`, or just visually track how allocations change the program break.
fn block_until_enter_pressed() {
  println!("\n>>> Press ENTER to continue...");
  let _ = std::io::stdin().bytes().next();
}

/// Prints the current program break using `sbrk(0)`.
/// The program break is the upper boundary of the heap managed via brk/sbrk.
unsafe fn print_program_break(label: &str) {
  println!(
    "[{}] PID = {}, program break (sbrk(0)) = {:?}",
    label,
    std::process::id(),
    unsafe { sbrk(0) },
  );
}

fn print_alloc(label: &str, size: usize, p: *mut u8) {
  println!("{label}: requested {size} bytes, got {p:?}");
}

fn main() {
  // Run with `RUST_LOG=rallocator=debug` to see `initialize`/`heap::extend`
  // log their region-growth decisions alongside this walkthrough's own output.
  env_logger::init();

  // Our general-purpose allocator. It holds three pointers into a region
  // obtained from `sbrk`:
  // - `prologue`, a permanently allocated sentinel that terminates the
  //   free list
  // - `free_head`, the most recently freed block (LIFO)
  // - `epilogue`, the current high-water mark
  // Unlike a bump allocator, freed blocks are coalesced with their
  // physically adjacent neighbors and reused by later `allocate` calls.
  let mut allocator = Allocator::new();

  unsafe {
    assert_eq!(allocator.initialize(), 0, "failed to initialize the heap");

    // Initial heap state
    print_program_break("start");
    block_until_enter_pressed();

    // --------------------------------------------------------------------
    // 1) Allocate space for a u32 (4 bytes, rounded up to the minimum
    //    block size).
    // --------------------------------------------------------------------
    let first_block = allocator.allocate(4);
    println!("\n[1] Allocate u32");
    print_alloc("[1]", 4, first_block);

    // Write something into the allocated memory to show it's usable.
    let first_ptr = first_block as *mut u32;
    first_ptr.write(0xDEADBEEF);
    println!("[1] Value written to first_block = 0x{:X}", first_ptr.read());

    block_until_enter_pressed();

    // --------------------------------------------------------------------
    // 2) Allocate 12 bytes (u8[12]).
    //    This shows how the allocator handles "odd-sized" allocations.
    // --------------------------------------------------------------------
    let second_block = allocator.allocate(12);
    println!("\n[2] Allocate [u8; 12]");
    print_alloc("[2]", 12, second_block);

    ptr::write_bytes(second_block, 0xAB, 12);
    println!("[2] Initialized second block with 0xAB");

    block_until_enter_pressed();

    // --------------------------------------------------------------------
    // 3) Allocate a u64 to confirm 16-byte payload alignment.
    // --------------------------------------------------------------------
    let third_block = allocator.allocate(8);
    println!("\n[3] Allocate u64 (observe alignment)");
    print_alloc("[3]", 8, third_block);

    let third_ptr = third_block as *mut u64;
    third_ptr.write(0x1122334455667788);
    println!("[3] Value written = 0x{:X}", third_ptr.read());

    let addr_third = third_block as usize;
    println!("[3] Address = {:#X}, addr % 16 = {}", addr_third, addr_third % 16);

    block_until_enter_pressed();

    // --------------------------------------------------------------------
    // 4) Allocate an array of u16 to force more pointer movement.
    // --------------------------------------------------------------------
    let fourth_block = allocator.allocate(32); // [u16; 16]
    println!("\n[4] Allocate [u16; 16]");
    print_alloc("[4]", 32, fourth_block);

    let fourth_ptr = fourth_block as *mut u16;
    for i in 0..16 {
      fourth_ptr.add(i).write(i as u16);
    }
    println!("[4] Wrote 0..15 into the u16 array");

    block_until_enter_pressed();

    // --------------------------------------------------------------------
    // 5) Release the first block.
    //
    //    Unlike a pure bump allocator, this frees the block back onto the
    //    explicit free list and coalesces it with any free neighbor.
    // --------------------------------------------------------------------
    allocator.release(first_block);
    println!("\n[5] Released first_block at {:?}", first_block);
    block_until_enter_pressed();

    // --------------------------------------------------------------------
    // 6) Allocate a small block (2 bytes) to see whether first-fit reuses
    //    the freed block.
    // --------------------------------------------------------------------
    let fifth_block = allocator.allocate(2);
    println!("\n[6] Allocate [u8; 2] (check reuse of freed block)");
    print_alloc("[6]", 2, fifth_block);

    println!(
      "[6] fifth_block == first_block? {}",
      if fifth_block == first_block {
        "Yes, first-fit reused the freed block"
      } else {
        "No, it allocated somewhere else"
      }
    );

    block_until_enter_pressed();

    // --------------------------------------------------------------------
    // 7) Grow the second block in place via reallocate, then watch the
    //    heap audit confirm nothing broke.
    // --------------------------------------------------------------------
    let grown = allocator.reallocate(second_block, 64);
    println!("\n[7] Reallocate second_block from 12 to 64 bytes -> {:?}", grown);
    let grown_bytes = std::slice::from_raw_parts(grown, 12);
    println!(
      "[7] original 12 bytes preserved? {}",
      grown_bytes.iter().all(|&b| b == 0xAB)
    );

    match allocator.check(0) {
      Ok(()) => println!("[7] heap audit: ok"),
      Err(e) => println!("[7] heap audit FAILED: {e}"),
    }

    block_until_enter_pressed();

    // --------------------------------------------------------------------
    // 8) Allocate a large block to observe heap growth via `sbrk`.
    // --------------------------------------------------------------------
    print_program_break("before large alloc");

    let big_block = allocator.allocate(64 * 1024);
    println!("\n[8] Allocate large 64 KiB block");
    print_alloc("[8]", 64 * 1024, big_block);

    print_program_break("after large alloc");
    block_until_enter_pressed();

    // --------------------------------------------------------------------
    // 9) End of demo.
    //
    //    This allocator never shrinks the break back down; released
    //    memory stays reusable on the free list but the OS only reclaims
    //    the whole region when the process exits.
    // --------------------------------------------------------------------
    println!("\n[9] End of example. Process will exit and the OS will reclaim all memory.");
  }
}
