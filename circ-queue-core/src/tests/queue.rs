use alloc::{format, string::String, vec, vec::Vec};

use crate::{CircularQueue, Deque, QueueError};

/// Queue of 4 slots holding `[3, 4, 5]` with the range wrapped:
/// `start == 2`, `stop == 1`.
fn wrapped() -> CircularQueue<u32> {
    let mut q = CircularQueue::new(3).unwrap();
    for v in 1..=3 {
        q.push_back(v).unwrap();
    }
    q.pop_front().unwrap();
    q.pop_front().unwrap();
    q.push_back(4).unwrap();
    q.push_back(5).unwrap();
    q
}

#[test]
fn test_new_rounds_up_with_sentinel() {
    let q = CircularQueue::<u32>::new(3).unwrap();
    assert_eq!(q.mask(), 3);
    assert_eq!(q.capacity(), 3);
    assert_eq!(q.capacity_slots(), 4);
    assert!(q.is_empty());

    let q = CircularQueue::<u32>::new(4).unwrap();
    assert_eq!(q.capacity_slots(), 8);
    assert_eq!(q.capacity(), 7);

    let q = CircularQueue::<u32>::new(0).unwrap();
    assert_eq!(q.capacity_slots(), 1);
    assert_eq!(q.capacity(), 0);
}

#[test]
fn test_realized_capacity_is_power_of_two() {
    for requested in 0..300 {
        let q = CircularQueue::<u8, u16>::new(requested).unwrap();
        let slots = q.capacity_slots();
        assert!(slots.is_power_of_two());
        assert_eq!(usize::from(q.mask()) + 1, slots);
        assert!(q.capacity() >= requested);
    }
}

#[test]
fn test_push_past_capacity_grows() {
    let mut q = CircularQueue::<char>::new(3).unwrap();
    for v in ['a', 'b', 'c'] {
        q.push_back(v).unwrap();
    }
    assert_eq!(q.len(), 3);
    assert_eq!(q.capacity(), 3);

    q.push_back('d').unwrap();
    assert_eq!(q.len(), 4);
    assert!(q.capacity() >= 6);
    assert_eq!(q.capacity_slots(), 8);

    let popped: Vec<char> = (0..4).map(|_| q.pop_front().unwrap()).collect();
    assert_eq!(popped, vec!['a', 'b', 'c', 'd']);
}

#[test]
fn test_one_doubling_per_boundary() {
    let mut q = CircularQueue::<u32>::new(0).unwrap();
    let mut doublings = 0;
    let mut slots = q.capacity_slots();
    for v in 0..1000 {
        q.push_back(v).unwrap();
        assert_eq!(q.size(), v as usize + 1);
        if q.capacity_slots() != slots {
            assert_eq!(q.capacity_slots(), slots * 2);
            slots = q.capacity_slots();
            doublings += 1;
        }
    }
    // 1 slot -> 1024 slots
    assert_eq!(doublings, 10);
}

#[test]
fn test_pop_back_then_empty() {
    let mut q = CircularQueue::<char>::new(1).unwrap();
    q.push_back('x').unwrap();
    assert_eq!(q.pop_back(), Ok('x'));
    assert_eq!(q.pop_front(), Err(QueueError::EmptyQueue));
    assert_eq!(q.len(), 0);
}

#[test]
fn test_pop_empty_fails() {
    let mut q = CircularQueue::<u32>::new(8).unwrap();
    assert!(q.pop().unwrap_err().is_empty_queue());
    assert_eq!(q.pop_back(), Err(QueueError::EmptyQueue));
    assert_eq!(q.len(), 0);

    q.push(1).unwrap();
    q.pop().unwrap();
    assert_eq!(q.pop_front(), Err(QueueError::EmptyQueue));
    assert_eq!(q.size(), 0);
}

#[test]
fn test_fifo_order() {
    let mut q: Deque<u32> = Deque::new(4).unwrap();
    for v in 0..100 {
        q.push_back(v).unwrap();
    }
    for v in 0..100 {
        assert_eq!(q.pop_front(), Ok(v));
    }
    assert!(q.is_empty());
}

#[test]
fn test_lifo_order() {
    let mut q = CircularQueue::<u32>::new(4).unwrap();
    for v in 0..100 {
        q.push_back(v).unwrap();
    }
    for v in (0..100).rev() {
        assert_eq!(q.pop_back(), Ok(v));
    }
    assert!(q.pop_back().is_err());
}

#[test]
fn test_wrapped_layout() {
    let q = wrapped();
    assert_eq!(q.start(), 2);
    assert_eq!(q.stop(), 1);
    assert_eq!(q.len(), 3);
    assert_eq!(q.as_slices(), (&[3, 4][..], &[5][..]));
    assert_eq!(q.front(), Some(&3));
    assert_eq!(q.back(), Some(&5));
    assert_eq!(q.get(2), Some(&5));
    assert_eq!(q.get(3), None);
}

#[test]
fn test_back_when_stop_is_zero() {
    let mut q = CircularQueue::<u32>::new(3).unwrap();
    for v in 1..=3 {
        q.push_back(v).unwrap();
    }
    q.pop_front().unwrap();
    q.push_back(4).unwrap();
    assert_eq!(q.stop(), 0);
    assert_eq!(q.back(), Some(&4));
    assert_eq!(q.pop_back(), Ok(4));
    assert_eq!(q.back(), Some(&3));
}

#[test]
fn test_front_back_empty() {
    let mut q = CircularQueue::<u32>::new(2).unwrap();
    assert_eq!(q.front(), None);
    assert_eq!(q.back(), None);
    assert_eq!(q.front_mut(), None);
    assert_eq!(q.back_mut(), None);
}

#[test]
fn test_push_returns_new_element() {
    let mut q = CircularQueue::<u32>::new(2).unwrap();
    *q.push_back(1).unwrap() += 10;
    *q.push_back_with(|| 2).unwrap() *= 3;
    assert_eq!(q.front(), Some(&11));
    assert_eq!(q.back(), Some(&6));

    *q.front_mut().unwrap() = 0;
    *q.back_mut().unwrap() = 9;
    *q.get_mut(0).unwrap() += 1;
    assert_eq!(q.to_vec(), vec![1, 9]);
}

#[test]
fn test_emplace_back_converts() {
    let mut q = CircularQueue::<String>::new(2).unwrap();
    q.emplace_back("hello").unwrap();
    q.emplace_back('!').unwrap();
    assert_eq!(q.pop_front().unwrap(), "hello");
    assert_eq!(q.pop_front().unwrap(), "!");
}

#[test]
fn test_push_pop_keeps_occupancy() {
    let mut q = CircularQueue::<u32>::new(3).unwrap();
    for v in 1..=3 {
        q.push_back(v).unwrap();
    }
    assert_eq!(q.push_pop(4), Ok(1));
    assert_eq!(q.push_pop(5), Ok(2));
    assert_eq!(q.capacity_slots(), 4);
    assert_eq!(q.to_vec(), vec![3, 4, 5]);
}

#[test]
fn test_push_pop_on_empty_has_no_effect() {
    let mut q = CircularQueue::<u32>::new(3).unwrap();
    assert_eq!(q.push_pop(7), Err(QueueError::EmptyQueue));
    assert!(q.is_empty());
}

#[test]
fn test_for_each_visits_in_order() {
    let mut q = wrapped();
    let mut seen = Vec::new();
    q.for_each(|v| {
        seen.push(*v);
        *v *= 2;
    });
    assert_eq!(seen, vec![3, 4, 5]);
    assert_eq!(q.to_vec(), vec![6, 8, 10]);
}

#[test]
fn test_to_vec_empties_queue() {
    let mut q = CircularQueue::<char>::new(3).unwrap();
    for v in ['a', 'b', 'c'] {
        q.push_back(v).unwrap();
    }
    assert_eq!(q.to_vec(), vec!['a', 'b', 'c']);
    assert!(q.is_empty());
    assert_eq!(q.capacity_slots(), 4);
    assert_eq!(q.to_vec(), Vec::<char>::new());
}

#[test]
fn test_clear_resets_indices() {
    let mut q = wrapped();
    q.clear();
    assert!(q.is_empty());
    assert_eq!(q.start(), 0);
    assert_eq!(q.stop(), 0);
    assert_eq!(q.capacity_slots(), 4);

    q.push_back(9).unwrap();
    assert_eq!(q.front(), Some(&9));
}

#[test]
fn test_release_leaves_reusable_husk() {
    let mut q = wrapped();
    q.release();
    assert_eq!(q.capacity_slots(), 0);
    assert_eq!(q.capacity(), 0);
    assert!(q.pop_front().is_err());

    q.push_back(1).unwrap();
    assert_eq!(q.capacity_slots(), 2);
    q.free();
    assert_eq!(q.capacity_slots(), 0);
}

#[test]
fn test_take_moves_allocation() {
    let mut src = wrapped();
    let dst = core::mem::take(&mut src);
    assert_eq!(src.capacity(), 0);
    assert_eq!(src.capacity_slots(), 0);
    assert!(src.is_empty());
    assert_eq!(dst.iter().copied().collect::<Vec<_>>(), vec![3, 4, 5]);
}

#[test]
fn test_clone_is_independent_and_linear() {
    let mut original = CircularQueue::<char>::new(3).unwrap();
    for v in ['o', 'p', 'q'] {
        original.push_back(v).unwrap();
    }
    original.pop_front().unwrap();

    let mut copy = original.clone();
    assert_eq!(copy.start(), 0);
    assert_eq!(copy.capacity_slots(), original.capacity_slots());
    assert_eq!(copy, original);

    copy.pop_front().unwrap();
    assert_eq!(original.len(), 2);
    assert_eq!(copy.to_vec(), vec!['q']);
    assert_eq!(original.try_clone().unwrap().to_vec(), vec!['p', 'q']);
}

#[test]
fn test_equality_ignores_layout() {
    let a = wrapped();
    let mut b: CircularQueue<u32> = CircularQueue::new(16).unwrap();
    b.try_extend([3, 4, 5]).unwrap();
    assert_eq!(a, b);
    b.push_back(6).unwrap();
    assert_ne!(a, b);
}

#[test]
fn test_debug_lists_elements() {
    assert_eq!(format!("{:?}", wrapped()), "[3, 4, 5]");
    assert_eq!(format!("{:?}", CircularQueue::<u8>::default()), "[]");
}

#[test]
fn test_default_grows_on_first_push() {
    let mut q = CircularQueue::<u64>::default();
    assert_eq!(q.capacity_slots(), 0);
    q.push_back(1).unwrap();
    q.push_back(2).unwrap();
    assert_eq!(q.to_vec(), vec![1, 2]);
}

#[test]
fn test_try_extend_and_into_iter() {
    let mut q = CircularQueue::<u32>::new(0).unwrap();
    q.try_extend(0..20).unwrap();
    assert_eq!(q.len(), 20);
    assert!(q.capacity() >= 20);

    let back: Vec<u32> = q.into_iter().rev().take(3).collect();
    assert_eq!(back, vec![19, 18, 17]);
}

#[test]
fn test_zero_sized_elements() {
    let mut q = CircularQueue::<()>::new(2).unwrap();
    for _ in 0..1000 {
        q.push_back(()).unwrap();
    }
    assert_eq!(q.len(), 1000);
    assert_eq!(q.drain().count(), 1000);
    assert!(q.is_empty());
}

#[test]
fn test_narrow_index_overflow() {
    assert!(CircularQueue::<u32, u8>::new(127).is_ok());
    assert_eq!(
        CircularQueue::<u32, u8>::new(128).unwrap_err(),
        QueueError::CapacityOverflow { requested: 129 }
    );

    let mut q = CircularQueue::<u32, u8>::new(127).unwrap();
    q.try_extend(0..127).unwrap();
    let mut called = false;
    let err = q
        .push_back_with(|| {
            called = true;
            127
        })
        .unwrap_err();
    assert_eq!(err, QueueError::CapacityOverflow { requested: 256 });
    assert!(!called);
    assert_eq!(q.len(), 127);
    assert_eq!(q.back(), Some(&126));
}

#[cfg(target_pointer_width = "64")]
#[test]
fn test_allocation_failure_on_construct() {
    let err = CircularQueue::<u64, usize>::new(usize::MAX / 2).unwrap_err();
    assert_eq!(
        err,
        QueueError::AllocationFailure {
            slots: 1usize << 63
        }
    );
}
